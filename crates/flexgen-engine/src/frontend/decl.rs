//! Declaration tree produced by the front end.
//!
//! The tree is arena-owned: nodes live in a `Vec` inside [`DeclTree`] and
//! refer to each other by [`DeclId`]. Consumers never hold owning references
//! into the tree; they borrow a [`DeclRef`] handle for as long as they need
//! to look at one node.

use crate::frontend::token::Span;

/// Index of a declaration inside its [`DeclTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(u32);

impl DeclId {
    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Record flavour (`struct`, `class` or `union`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTag {
    Struct,
    Class,
    Union,
}

impl RecordTag {
    /// Visibility members have before the first access specifier.
    pub fn default_access(self) -> Access {
        match self {
            RecordTag::Class => Access::Private,
            RecordTag::Struct | RecordTag::Union => Access::Public,
        }
    }
}

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
        }
    }
}

/// What kind of declaration a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    /// Root of the tree
    TranslationUnit,
    /// `namespace` or `extern "C" { ... }` block
    Namespace,
    /// `struct`, `class` or `union` with a body
    Record { tag: RecordTag },
    /// Data member of a record
    Field { ty: String },
    /// Member function of a record (constructors and destructors included)
    Method { return_type: String },
    /// `public:` / `protected:` / `private:`
    AccessSpec { access: Access },
    /// Namespace-scope variable
    Variable { ty: String },
    /// Namespace-scope function
    Function { return_type: String },
    /// Anything else the scanner recognizes but does not model
    Other,
}

impl DeclKind {
    /// Short human-readable name of the kind.
    pub fn describe(&self) -> &'static str {
        match self {
            DeclKind::TranslationUnit => "translation unit",
            DeclKind::Namespace => "namespace",
            DeclKind::Record { tag: RecordTag::Struct } => "struct",
            DeclKind::Record { tag: RecordTag::Class } => "class",
            DeclKind::Record { tag: RecordTag::Union } => "union",
            DeclKind::Field { .. } => "field",
            DeclKind::Method { .. } => "method",
            DeclKind::AccessSpec { .. } => "access specifier",
            DeclKind::Variable { .. } => "variable",
            DeclKind::Function { .. } => "function",
            DeclKind::Other => "declaration",
        }
    }
}

/// An annotation marker attached to a declaration, captured verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// The marker string (e.g. `{gen};{attr};reflectable;`)
    pub text: String,
    /// Where the attribute carrying the marker was written
    pub span: Span,
}

impl Annotation {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

/// A declaration node.
#[derive(Debug, Clone)]
pub struct Decl {
    pub kind: DeclKind,
    /// Unqualified name; empty for anonymous declarations
    pub name: String,
    /// Full extent, attributes and terminating `;`/`}` included
    pub span: Span,
    /// Closing brace of a record or namespace body
    pub body_close: Option<Span>,
    pub annotations: Vec<Annotation>,
    pub parent: Option<DeclId>,
    pub children: Vec<DeclId>,
}

impl Decl {
    pub fn new(kind: DeclKind, name: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            name: name.into(),
            span,
            body_close: None,
            annotations: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_body_close(mut self, close: Span) -> Self {
        self.body_close = Some(close);
        self
    }
}

/// Arena of declarations rooted at a translation unit.
#[derive(Debug, Clone)]
pub struct DeclTree {
    decls: Vec<Decl>,
}

impl DeclTree {
    /// Create a tree holding only the translation unit root.
    pub fn new(source_len: usize) -> Self {
        let root = Decl::new(
            DeclKind::TranslationUnit,
            "",
            Span::new(0, source_len, 1, 1),
        );
        Self { decls: vec![root] }
    }

    pub fn root(&self) -> DeclId {
        DeclId(0)
    }

    /// Append `decl` as the last child of `parent`.
    pub fn add(&mut self, parent: DeclId, mut decl: Decl) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        decl.parent = Some(parent);
        self.decls.push(decl);
        self.decls[parent.index()].children.push(id);
        id
    }

    pub fn get(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.index()]
    }

    /// Borrow a read-only handle to a node.
    pub fn node(&self, id: DeclId) -> DeclRef<'_> {
        DeclRef { tree: self, id }
    }

    pub fn root_node(&self) -> DeclRef<'_> {
        self.node(self.root())
    }

    /// Number of declarations, root included.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.len() == 1
    }

    /// All declarations in pre-order (source order), root excluded.
    pub fn preorder(&self) -> Vec<DeclId> {
        let mut order = Vec::with_capacity(self.decls.len());
        let mut stack: Vec<DeclId> = self.get(self.root()).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.get(id).children.iter().rev().copied());
        }
        order
    }
}

/// Read-only handle to one declaration.
#[derive(Debug, Clone, Copy)]
pub struct DeclRef<'t> {
    tree: &'t DeclTree,
    id: DeclId,
}

impl<'t> DeclRef<'t> {
    pub fn id(&self) -> DeclId {
        self.id
    }

    pub fn tree(&self) -> &'t DeclTree {
        self.tree
    }

    pub fn decl(&self) -> &'t Decl {
        self.tree.get(self.id)
    }

    pub fn kind(&self) -> &'t DeclKind {
        &self.decl().kind
    }

    pub fn name(&self) -> &'t str {
        &self.decl().name
    }

    pub fn span(&self) -> Span {
        self.decl().span
    }

    pub fn annotations(&self) -> &'t [Annotation] {
        &self.decl().annotations
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind(), DeclKind::Record { .. })
    }

    /// Direct members (children) in source order.
    pub fn members(&self) -> impl Iterator<Item = DeclRef<'t>> + 't {
        let tree = self.tree;
        self.decl()
            .children
            .iter()
            .map(move |&id| DeclRef { tree, id })
    }

    pub fn parent(&self) -> Option<DeclRef<'t>> {
        self.decl().parent.map(|id| DeclRef {
            tree: self.tree,
            id,
        })
    }

    /// Name qualified by enclosing namespaces and records (`ns::Outer::Inner`).
    pub fn qualified_name(&self) -> String {
        if self.name().is_empty() {
            return String::new();
        }
        let mut parts = vec![self.name()];
        let mut current = self.parent();
        while let Some(node) = current {
            if !node.name().is_empty() {
                parts.push(node.name());
            }
            current = node.parent();
        }
        parts.reverse();
        parts.join("::")
    }

    /// Human-readable identity used in diagnostics: `struct Foo` or
    /// `field m_bar`.
    pub fn describe(&self) -> String {
        let name = self.qualified_name();
        if name.is_empty() {
            format!("anonymous {}", self.kind().describe())
        } else {
            format!("{} {}", self.kind().describe(), name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span::new(start, end, 1, start as u32 + 1)
    }

    #[test]
    fn test_empty_tree() {
        let tree = DeclTree::new(0);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert!(tree.preorder().is_empty());
    }

    #[test]
    fn test_members_in_insertion_order() {
        let mut tree = DeclTree::new(100);
        let record = tree.add(
            tree.root(),
            Decl::new(DeclKind::Record { tag: RecordTag::Struct }, "S", span(0, 50)),
        );
        tree.add(record, Decl::new(DeclKind::Field { ty: "int".into() }, "b", span(10, 16)));
        tree.add(record, Decl::new(DeclKind::Field { ty: "int".into() }, "a", span(17, 23)));

        let names: Vec<_> = tree.node(record).members().map(|m| m.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_preorder_is_source_order() {
        let mut tree = DeclTree::new(100);
        let ns = tree.add(tree.root(), Decl::new(DeclKind::Namespace, "ns", span(0, 60)));
        let record = tree.add(ns, Decl::new(DeclKind::Record { tag: RecordTag::Class }, "C", span(14, 40)));
        let field = tree.add(record, Decl::new(DeclKind::Field { ty: "int".into() }, "x", span(24, 30)));
        let var = tree.add(tree.root(), Decl::new(DeclKind::Variable { ty: "int".into() }, "v", span(61, 67)));

        assert_eq!(tree.preorder(), vec![ns, record, field, var]);
    }

    #[test]
    fn test_qualified_name_and_describe() {
        let mut tree = DeclTree::new(100);
        let ns = tree.add(tree.root(), Decl::new(DeclKind::Namespace, "ns", span(0, 60)));
        let record = tree.add(ns, Decl::new(DeclKind::Record { tag: RecordTag::Struct }, "S", span(14, 40)));
        let field = tree.add(record, Decl::new(DeclKind::Field { ty: "int".into() }, "x", span(24, 30)));

        assert_eq!(tree.node(field).qualified_name(), "ns::S::x");
        assert_eq!(tree.node(record).describe(), "struct ns::S");
        assert_eq!(tree.node(field).parent().map(|p| p.id()), Some(record));
    }

    #[test]
    fn test_default_access() {
        assert_eq!(RecordTag::Class.default_access(), Access::Private);
        assert_eq!(RecordTag::Struct.default_access(), Access::Public);
    }
}
