use std::borrow::Cow;
use std::io::Write;
use std::sync::Arc;

use ptree::print_config::UTF_CHARS;
use ptree::{write_tree_with, PrintConfig, Style, TreeItem};

use crate::tree::TreeNode;

lazy_static! {
    static ref PRINT_CONFIG: PrintConfig = PrintConfig {
        indent: 3,
        characters: UTF_CHARS.into(),
        ..Default::default()
    };
}

struct TreeDisplay<T>(Arc<T>);

impl<T> Clone for TreeDisplay<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: TreeNode> TreeItem for TreeDisplay<T> {
    type Child = Self;

    fn write_self<W: Write>(&self, f: &mut W, style: &Style) -> std::io::Result<()> {
        write!(f, "{}", style.paint(self.0.caption()))
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(
            self.0
                .children()
                .into_iter()
                .map(TreeDisplay)
                .collect::<Vec<_>>(),
        )
    }
}

/// Writes `root` as an indented tree of captions.
pub fn write_tree<T: TreeNode, W: Write>(root: &Arc<T>, output: &mut W) -> std::io::Result<()> {
    write_tree_with(&TreeDisplay(Arc::clone(root)), output, &PRINT_CONFIG)
}

pub(crate) fn render_tree<T: TreeNode>(root: &Arc<T>) -> String {
    let mut buf = Vec::new();
    match write_tree(root, &mut buf) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(e) => format!("<failed to render {}: {}>", root.node_name(), e),
    }
}

#[cfg(test)]
mod tests {
    use datafusion_expr::Operator;

    use crate::expr::{alias, binary, lit, not};
    use crate::tree::TreeNode;

    #[test]
    fn test_expression_tree_string() {
        let expr = alias(binary(not(lit(true)), Operator::Or, lit(false)), "flag");
        let expr_id = expr.expr_id().unwrap();

        let expected = format!(
            "\
Alias {{ name: flag, expr_id: {} }}
└─ Binary {{ op: OR }}
   ├─ Not
   │  └─ Literal {{ value: true }}
   └─ Literal {{ value: false }}
",
            expr_id
        );

        assert_eq!(expected, expr.tree_string());
    }
}
