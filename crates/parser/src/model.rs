//! Parsed listing with declaration handles and name lookup
//!
//! Every stage downstream of the parser receives a `&SourceListing` and refers
//! to declarations by [`DeclId`]. Lookups never mutate the listing, so the same
//! listing can be analysed any number of times with identical results.

use crate::parser::parse_declarations;
use crate::syntax::{DeclarationKind, TypeDeclaration, TypeSyntax};
use soap_client_generator_common::Result;
use std::collections::HashMap;

/// Handle of a declaration within a [`SourceListing`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(usize);

impl DeclId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// All type declarations of a listing, in source order
#[derive(Debug, Clone, Default)]
pub struct SourceListing {
    declarations: Vec<TypeDeclaration>,
    /// Enclosing declaration of each nested type
    parents: Vec<Option<DeclId>>,
    by_qualified: HashMap<String, DeclId>,
    /// Short names that are unique within the listing
    by_short: HashMap<String, Option<DeclId>>,
}

impl SourceListing {
    /// Parse listing source text
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self::from_declarations(parse_declarations(source)?))
    }

    /// Index already-parsed declarations; nested types follow their parent
    pub fn from_declarations(roots: Vec<TypeDeclaration>) -> Self {
        let mut declarations = Vec::new();
        let mut parents = Vec::new();
        for root in roots {
            flatten(root, None, &mut declarations, &mut parents);
        }

        let mut by_qualified = HashMap::new();
        let mut by_short: HashMap<String, Option<DeclId>> = HashMap::new();
        for (index, declaration) in declarations.iter().enumerate() {
            let id = DeclId(index);
            by_qualified
                .entry(declaration.qualified_name())
                .or_insert(id);
            by_short
                .entry(declaration.name.clone())
                .and_modify(|slot| *slot = None)
                .or_insert(Some(id));
        }

        Self {
            declarations,
            parents,
            by_qualified,
            by_short,
        }
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declaration behind a handle
    ///
    /// Handles are only ever created by this listing, so indexing cannot fail.
    pub fn get(&self, id: DeclId) -> &TypeDeclaration {
        &self.declarations[id.0]
    }

    /// Every declaration with its handle, in source order
    pub fn declarations(&self) -> impl Iterator<Item = (DeclId, &TypeDeclaration)> {
        self.declarations
            .iter()
            .enumerate()
            .map(|(index, declaration)| (DeclId(index), declaration))
    }

    /// Whether a declaration sits directly in a namespace (or the file)
    pub fn is_top_level(&self, id: DeclId) -> bool {
        self.parents[id.0].is_none()
    }

    /// Resolve a type reference to a declaration in this listing
    ///
    /// Tries the fully qualified name first, then a short name that is unique
    /// in the listing. Arrays and nullables never resolve.
    pub fn lookup(&self, ty: &TypeSyntax) -> Option<DeclId> {
        let dotted = ty.dotted_name()?;
        if let Some(id) = self.by_qualified.get(&dotted) {
            return Some(*id);
        }
        self.by_short.get(ty.short_name()).copied().flatten()
    }

    /// Resolve a type reference written inside `from`, preferring its namespace
    pub fn lookup_from(&self, from: DeclId, ty: &TypeSyntax) -> Option<DeclId> {
        if let (Some(namespace), Some(dotted)) = (&self.get(from).namespace, ty.dotted_name()) {
            if let Some(id) = self.by_qualified.get(&format!("{}.{}", namespace, dotted)) {
                return Some(*id);
            }
        }
        self.lookup(ty)
    }

    /// Syntax of the base class, when the first base type is not an interface
    ///
    /// Types outside the listing are taken to be interfaces when named by the
    /// `IName` convention.
    pub fn base_type_syntax(&self, id: DeclId) -> Option<&TypeSyntax> {
        let declaration = self.get(id);
        let base = declaration.base_list.first()?;
        match self.lookup_from(id, base) {
            Some(found) if self.get(found).kind == DeclarationKind::Interface => None,
            Some(_) => Some(base),
            None if is_interface_name(base.short_name()) => None,
            None => Some(base),
        }
    }
}

fn is_interface_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().is_some_and(char::is_uppercase)
}

fn flatten(
    mut declaration: TypeDeclaration,
    parent: Option<DeclId>,
    out: &mut Vec<TypeDeclaration>,
    parents: &mut Vec<Option<DeclId>>,
) {
    let nested = std::mem::take(&mut declaration.nested);
    let id = DeclId(out.len());
    out.push(declaration);
    parents.push(parent);
    for child in nested {
        flatten(child, Some(id), out, parents);
    }
}
