//! Lazy depth-first, pre-order tree traversal.

use std::sync::Arc;

use crate::errors::CatalogError;
use crate::node::Node;
use crate::visit::Visitor;

/// Walk a tree, yielding every payload the visitor produces.
///
/// The traversal is lazy: control returns to the caller after each payload
/// and resumes exactly where it left off on the next pull. Dropping the
/// iterator cancels the walk; nothing is precomputed. A parent's payload is
/// always yielded before any descendant's; sibling order is whatever the
/// storage listing returned.
pub fn walk<V: Visitor>(root: Arc<Node>, visitor: V) -> Walk<V> {
    Walk {
        stack: vec![(root, visitor)],
        failed: false,
    }
}

/// Iterator state of one traversal. Not restartable.
pub struct Walk<V: Visitor> {
    stack: Vec<(Arc<Node>, V)>,
    failed: bool,
}

impl<V: Visitor> Iterator for Walk<V> {
    type Item = Result<V::Payload, CatalogError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while let Some((node, visitor)) = self.stack.pop() {
            let result = match node.accept(&visitor) {
                Ok(result) => result,
                Err(error) => {
                    self.failed = true;
                    self.stack.clear();
                    return Some(Err(error));
                }
            };

            if result.explore_next {
                // Reversed push keeps listing order on the stack.
                for child in node.children().iter().rev() {
                    self.stack.push((Arc::clone(child), visitor.advance(&result)));
                }
            }
            if let Some(payload) = result.payload {
                return Some(Ok(payload));
            }
        }
        None
    }
}
