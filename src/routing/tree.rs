//! Path matching tree.
//!
//! # Responsibilities
//! - Register slash-separated paths, one node per distinct prefix
//! - Reject inconsistent registrations eagerly
//! - Resolve request paths to a handler plus captured values
//!
//! # Matching Rules
//! ```text
//! Register:  "/users/:id/edit"  →  root → "users" → :id → "edit"
//!            "/static/*"        →  root → "static" → *
//!
//! Lookup, per node and head segment, first success wins:
//!     1. literal child named after the segment
//!     2. variable child (never for an empty segment)
//!     3. wildcard child, which swallows every remaining segment
//! ```
//!
//! # Design Decisions
//! - No regex: matching is a bounded depth-first walk, at most three
//!   alternatives per segment
//! - Empty segments are real segments, so `/foo` and `/foo/` differ
//! - Captures are committed only along the branch that finally matches
//! - Immutable during lookup (`&self`), so a built tree is shared freely

use std::collections::HashMap;
use std::fmt;

use super::captures::{Captures, WILDCARD};
use super::error::RouteError;

/// A routing table: the root of a tree of [`Node`]s.
///
/// `H` is whatever the caller dispatches to. The HTTP layer uses
/// [`Handler`](super::Handler); the CLI uses route names.
#[derive(Debug)]
pub struct PathTree<H> {
    root: Node<H>,
}

/// One vertex of the tree, reached by a unique registration prefix.
#[derive(Debug)]
pub struct Node<H> {
    /// Registration path leading here, e.g. `/users/:id`.
    pattern: String,
    /// Set on the child created for a `*` segment.
    wildcard: bool,
    handler: Option<H>,
    literals: HashMap<String, Node<H>>,
    variable: Option<(String, Box<Node<H>>)>,
    fallback: Option<Box<Node<H>>>,
}

/// Successful lookup result.
#[derive(Debug)]
pub struct Match<'a, H> {
    handler: &'a H,
    pattern: &'a str,
    captures: Captures,
}

impl<H> Default for PathTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> PathTree<H> {
    /// Create an empty tree. Nothing matches until a route is registered.
    pub fn new() -> Self {
        Self {
            root: Node::new(String::new(), false),
        }
    }

    /// Get (creating as needed) the node for `path`.
    ///
    /// A leading `/` is optional: `"foo/bar"` and `"/foo/bar"` name the same
    /// node, as do `""` and `"/"`.
    pub fn route(&mut self, path: &str) -> Result<&mut Node<H>, RouteError> {
        self.root.route(path)
    }

    /// Register `handler` at `path`.
    pub fn insert(&mut self, path: &str, handler: H) -> Result<(), RouteError> {
        self.route(path)?.set_handler(handler)
    }

    /// Resolve a request path.
    ///
    /// Returns `Ok(None)` when nothing matches. A path that does not begin
    /// with `/` is a caller bug and yields [`RouteError::MalformedPath`].
    pub fn lookup(&self, path: &str) -> Result<Option<Match<'_, H>>, RouteError> {
        let segments = split_request_path(path)?;
        let mut bindings = Vec::new();

        Ok(self.root.find(&segments, &mut bindings).map(|(node, handler)| {
            let mut captures = Captures::new();
            commit(bindings, &mut captures);
            Match {
                handler,
                pattern: &node.pattern,
                captures,
            }
        }))
    }

    /// Resolve a request path, writing captures into a caller-owned map.
    ///
    /// On a miss the map is left exactly as it was.
    pub fn lookup_into(&self, path: &str, captures: &mut Captures) -> Result<Option<&H>, RouteError> {
        let segments = split_request_path(path)?;
        let mut bindings = Vec::new();

        Ok(self.root.find(&segments, &mut bindings).map(|(_, handler)| {
            commit(bindings, captures);
            handler
        }))
    }

    /// The root node. Its own handler slot is never matched: even `/` is one
    /// (empty) segment below it.
    pub fn root(&self) -> &Node<H> {
        &self.root
    }
}

impl<H> Node<H> {
    fn new(pattern: String, wildcard: bool) -> Self {
        Self {
            pattern,
            wildcard,
            handler: None,
            literals: HashMap::new(),
            variable: None,
            fallback: None,
        }
    }

    /// Get (creating as needed) the node for `path` below this one.
    ///
    /// `node.route("a")?.route("b")` and `node.route("a/b")` are the same
    /// node, so subtrees can be assembled piecewise.
    pub fn route(&mut self, path: &str) -> Result<&mut Node<H>, RouteError> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let segments: Vec<&str> = path.split('/').collect();
        self.check_segments(path, &segments)?;

        let mut node = self;
        for segment in segments {
            node = node.child(segment)?;
        }
        Ok(node)
    }

    /// Attach the handler for exactly this node.
    pub fn set_handler(&mut self, handler: H) -> Result<(), RouteError> {
        if self.handler.is_some() {
            return Err(RouteError::DuplicateHandler {
                pattern: self.pattern.clone(),
            });
        }
        self.handler = Some(handler);
        Ok(())
    }

    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True for the node created by a `*` segment.
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Reject what can be judged from the path alone, before any node is
    /// created. The remaining conflicts only arise at nodes that already
    /// exist, so a failed registration never leaves a partial branch behind.
    fn check_segments(&self, path: &str, segments: &[&str]) -> Result<(), RouteError> {
        // A wildcard swallows everything after it; nothing below is reachable.
        let dead_tail = segments
            .iter()
            .position(|segment| *segment == WILDCARD)
            .is_some_and(|at| at + 1 < segments.len());
        if self.wildcard || dead_tail {
            return Err(RouteError::WildcardNotLast {
                pattern: format!("{}/{}", self.pattern, path),
            });
        }

        if let Some(at) = segments.iter().position(|segment| *segment == ":") {
            return Err(RouteError::EmptyVariable {
                pattern: format!("{}/{}", self.pattern, segments[..=at].join("/")),
            });
        }
        Ok(())
    }

    fn child(&mut self, segment: &str) -> Result<&mut Node<H>, RouteError> {
        let pattern = format!("{}/{}", self.pattern, segment);

        if let Some(name) = segment.strip_prefix(':') {
            if name.is_empty() {
                return Err(RouteError::EmptyVariable { pattern });
            }
            if let Some((existing, _)) = &self.variable {
                if existing != name {
                    return Err(RouteError::VariableConflict {
                        pattern,
                        existing: existing.clone(),
                        requested: name.to_owned(),
                    });
                }
            }
            let (_, child) = self
                .variable
                .get_or_insert_with(|| (name.to_owned(), Box::new(Node::new(pattern, false))));
            return Ok(child.as_mut());
        }

        if segment == WILDCARD {
            if self.fallback.is_some() {
                return Err(RouteError::DuplicateWildcard { pattern });
            }
            return Ok(self.fallback.insert(Box::new(Node::new(pattern, true))).as_mut());
        }

        Ok(self
            .literals
            .entry(segment.to_owned())
            .or_insert_with(|| Node::new(pattern, false)))
    }

    /// Depth-first search over the remaining segments.
    ///
    /// Bindings are pushed while unwinding out of the successful branch, so
    /// the deepest binding comes first and failed branches push nothing.
    fn find<'t>(
        &'t self,
        segments: &[&str],
        bindings: &mut Vec<(&'t str, String)>,
    ) -> Option<(&'t Node<H>, &'t H)> {
        let Some((head, rest)) = segments.split_first() else {
            return self.handler.as_ref().map(|handler| (self, handler));
        };

        if let Some(child) = self.literals.get(*head) {
            if let Some(found) = child.find(rest, bindings) {
                return Some(found);
            }
        }

        if !head.is_empty() {
            if let Some((name, child)) = &self.variable {
                if let Some(found) = child.find(rest, bindings) {
                    bindings.push((name.as_str(), (*head).to_owned()));
                    return Some(found);
                }
            }
        }

        let fallback = self.fallback.as_deref()?;
        let handler = fallback.handler.as_ref()?;
        bindings.push((WILDCARD, segments.join("/")));
        Some((fallback, handler))
    }
}

impl<H: fmt::Debug> Node<H> {
    fn dump(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = depth * 2;

        if let Some(handler) = &self.handler {
            writeln!(f, "{:indent$}=> {:?}", "", handler, indent = indent)?;
        }

        let mut literals: Vec<_> = self.literals.iter().collect();
        literals.sort_by(|a, b| a.0.cmp(b.0));
        for (segment, child) in literals {
            writeln!(f, "{:indent$}{}/", "", segment, indent = indent)?;
            child.dump(f, depth + 1)?;
        }

        if let Some((name, child)) = &self.variable {
            writeln!(f, "{:indent$}:{}", "", name, indent = indent)?;
            child.dump(f, depth + 1)?;
        }

        if let Some(child) = &self.fallback {
            writeln!(f, "{:indent$}*", "", indent = indent)?;
            child.dump(f, depth + 1)?;
        }

        Ok(())
    }
}

/// Indented listing of the whole tree, for debugging route tables.
impl<H: fmt::Debug> fmt::Display for PathTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.dump(f, 0)
    }
}

impl<'a, H> Match<'a, H> {
    pub fn handler(&self) -> &'a H {
        self.handler
    }

    /// Registration path of the matched route, e.g. `/users/:id`.
    pub fn pattern(&self) -> &'a str {
        self.pattern
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn into_captures(self) -> Captures {
        self.captures
    }
}

fn split_request_path(path: &str) -> Result<Vec<&str>, RouteError> {
    match path.strip_prefix('/') {
        Some(rest) => Ok(rest.split('/').collect()),
        None => Err(RouteError::MalformedPath {
            path: path.to_owned(),
        }),
    }
}

/// Apply bindings shallowest first so deeper ones overwrite on name clashes.
fn commit(bindings: Vec<(&str, String)>, captures: &mut Captures) {
    for (name, value) in bindings.into_iter().rev() {
        captures.insert(name, value);
    }
}
