/// A single named tag with an ordered forest of child tags.
///
/// Tags are pure data: they are built bottom-up, either from interactive
/// input or from a decoded database entry, so the tree is acyclic by
/// construction. Names are not validated and need not be unique among
/// siblings (but see the codec notes on what duplicates persist as).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub children: Vec<Tag>,
}

impl Tag {
    /// Create a childless tag with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Create a tag owning the given child forest
    pub fn with_children(name: impl Into<String>, children: Vec<Tag>) -> Self {
        Tag {
            name: name.into(),
            children,
        }
    }
}

/// Append the depth-first listing of `children` to `out`: one `|- ` marker
/// per node, three spaces of indent per level below the first.
///
/// Shared by tag subtrees and whole tasks — anything with a name and a child
/// forest renders through here.
pub fn render_children(out: &mut String, children: &[Tag], depth: usize) {
    for child in children {
        for _ in 0..depth {
            out.push_str("   ");
        }
        out.push_str("|- ");
        out.push_str(&child.name);
        out.push('\n');
        render_children(out, &child.children, depth + 1);
    }
}

/// Render a named line followed by its tag forest
pub fn render_tree(name: &str, children: &[Tag]) -> String {
    let mut out = String::new();
    out.push_str(name);
    out.push('\n');
    render_children(&mut out, children, 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tag_has_fresh_children() {
        let mut a = Tag::new("a");
        let b = Tag::new("b");
        a.children.push(Tag::new("under-a"));
        assert!(b.children.is_empty());
    }

    #[test]
    fn render_marks_and_indents_each_level() {
        let forest = vec![
            Tag::new("milk"),
            Tag::with_children("work", vec![Tag::new("urgent")]),
        ];
        assert_eq!(
            render_tree("groceries", &forest),
            "groceries\n|- milk\n|- work\n   |- urgent\n"
        );
    }

    #[test]
    fn render_deep_tree() {
        let forest = vec![Tag::with_children(
            "a",
            vec![Tag::with_children("b", vec![Tag::new("c")])],
        )];
        assert_eq!(
            render_tree("root", &forest),
            "root\n|- a\n   |- b\n      |- c\n"
        );
    }
}
