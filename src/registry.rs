//! Immutable document catalog, validated once at construction

use crate::assembler::MARKER_PREFIX;
use crate::error::RegistryError;
use crate::types::{Document, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Process-wide lookup table; share it through `Arc`, never mutate it
#[derive(Debug, Clone)]
pub struct DocumentRegistry {
    documents: Vec<Document>,
    index: HashMap<String, usize>,
    conflict_pairs: HashSet<(usize, usize)>,
}

pub type SharedRegistry = Arc<DocumentRegistry>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl DocumentRegistry {
    /// Build and validate the registry. Fails fast on any inconsistency.
    pub fn new(documents: Vec<Document>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(documents.len());
        for (idx, doc) in documents.iter().enumerate() {
            check_renderable(doc)?;
            if index.insert(doc.id.clone(), idx).is_some() {
                return Err(RegistryError::DuplicateId(doc.id.clone()));
            }
        }

        let mut conflict_pairs = HashSet::new();
        for (idx, doc) in documents.iter().enumerate() {
            for req in &doc.requires {
                let Some(&req_idx) = index.get(req) else {
                    return Err(RegistryError::DanglingReference {
                        from: doc.id.clone(),
                        field: "requires",
                        missing: req.clone(),
                    });
                };
                let required = &documents[req_idx];
                if doc.priority_tier == 0 && required.priority_tier > 0 {
                    return Err(RegistryError::TierInversion {
                        id: doc.id.clone(),
                        requires: required.id.clone(),
                        tier: required.priority_tier,
                    });
                }
            }
            for other in &doc.conflicts {
                let Some(&other_idx) = index.get(other) else {
                    return Err(RegistryError::DanglingReference {
                        from: doc.id.clone(),
                        field: "conflicts",
                        missing: other.clone(),
                    });
                };
                if other_idx == idx {
                    return Err(RegistryError::SelfConflict(doc.id.clone()));
                }
                conflict_pairs.insert((idx.min(other_idx), idx.max(other_idx)));
            }
        }

        let registry = Self {
            documents,
            index,
            conflict_pairs,
        };
        registry.check_acyclic()?;

        debug!(
            "Registry ready: {} documents, {} conflict pairs",
            registry.documents.len(),
            registry.conflict_pairs.len()
        );
        Ok(registry)
    }

    pub fn shared(self) -> SharedRegistry {
        Arc::new(self)
    }

    fn check_acyclic(&self) -> Result<(), RegistryError> {
        let mut marks = vec![Mark::Unvisited; self.documents.len()];
        let mut path = Vec::new();
        for idx in 0..self.documents.len() {
            if marks[idx] == Mark::Unvisited {
                self.visit(idx, &mut marks, &mut path)?;
            }
        }
        Ok(())
    }

    fn visit(&self, idx: usize, marks: &mut [Mark], path: &mut Vec<usize>) -> Result<(), RegistryError> {
        marks[idx] = Mark::InProgress;
        path.push(idx);

        for req in &self.documents[idx].requires {
            let next = self.index[req];
            match marks[next] {
                Mark::Done => {}
                Mark::Unvisited => self.visit(next, marks, path)?,
                Mark::InProgress => {
                    // Back edge: report the loop starting at its first occurrence
                    let start = path.iter().position(|&p| p == next).unwrap_or(0);
                    let mut cycle: Vec<String> = path[start..]
                        .iter()
                        .map(|&p| self.documents[p].id.clone())
                        .collect();
                    cycle.push(self.documents[next].id.clone());
                    return Err(RegistryError::CyclicDependency { cycle });
                }
            }
        }

        path.pop();
        marks[idx] = Mark::Done;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.index.get(id).map(|&idx| &self.documents[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Documents matching a selector, in registry order
    pub fn select(&self, selector: &Selector) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|doc| selector.matches(&doc.id))
            .collect()
    }

    /// Whether two documents are declared mutually exclusive (either side may declare)
    pub fn conflicts(&self, a: &str, b: &str) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&ia), Some(&ib)) => self.conflict_pairs.contains(&(ia.min(ib), ia.max(ib))),
            _ => false,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

// Ids and content must survive a render/split round trip
fn check_renderable(doc: &Document) -> Result<(), RegistryError> {
    if doc.id.is_empty() || doc.id.chars().any(|c| c.is_whitespace() || c == '>') {
        return Err(RegistryError::InvalidId(doc.id.clone()));
    }
    if let Some(line) = doc.content.lines().position(|l| l.starts_with(MARKER_PREFIX)) {
        return Err(RegistryError::MarkerInContent {
            id: doc.id.clone(),
            line: line + 1,
        });
    }
    Ok(())
}
