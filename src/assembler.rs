//! Bundle assembly and the section marker format

use crate::error::AssemblyError;
use crate::registry::DocumentRegistry;
use crate::types::*;

pub const MARKER_PREFIX: &str = "<<<norns-context:document ";
pub const MARKER_SUFFIX: &str = ">>>";

/// Concatenate the included documents in packed order. No filtering happens here.
pub fn assemble(packed: &PackedSet, registry: &DocumentRegistry) -> Result<Bundle, AssemblyError> {
    let mut sections = Vec::new();
    let mut total_size = 0;

    for entry in packed.included() {
        let doc = registry
            .get(&entry.id)
            .ok_or_else(|| AssemblyError::UnknownDocument(entry.id.clone()))?;
        total_size += doc.size_estimate;
        sections.push(BundleSection {
            id: doc.id.clone(),
            category: doc.category,
            priority_tier: doc.priority_tier,
            content: doc.content.clone(),
        });
    }

    Ok(Bundle {
        sections,
        complexity_hint: packed.complexity_hint,
        total_size,
    })
}

pub fn marker_line(id: &str, category: Category) -> String {
    format!("{}id={} category={}{}", MARKER_PREFIX, id, category, MARKER_SUFFIX)
}

impl Bundle {
    /// Render as one text blob: a marker line before each section's content.
    /// Content lines must not begin with `MARKER_PREFIX`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&marker_line(&section.id, section.category));
            out.push('\n');
            out.push_str(&section.content);
            out.push('\n');
        }
        out
    }

    pub fn ids(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// One section recovered from rendered bundle text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSection {
    pub id: String,
    pub category: Category,
    pub content: String,
}

/// Inverse of `Bundle::render`
pub fn split_bundle(text: &str) -> Result<Vec<SplitSection>, AssemblyError> {
    let mut sections: Vec<SplitSection> = Vec::new();

    for line in text.split_inclusive('\n') {
        let bare = line.strip_suffix('\n').unwrap_or(line);
        if bare.starts_with(MARKER_PREFIX) {
            close_section(&mut sections);
            let (id, category) = parse_marker(bare)?;
            sections.push(SplitSection {
                id,
                category,
                content: String::new(),
            });
            continue;
        }
        match sections.last_mut() {
            Some(current) => current.content.push_str(line),
            None if line.trim().is_empty() => {}
            None => return Err(AssemblyError::MissingLeadingMarker),
        }
    }
    close_section(&mut sections);

    Ok(sections)
}

// Drop the newline render() appends after each section's content
fn close_section(sections: &mut [SplitSection]) {
    if let Some(last) = sections.last_mut() {
        if last.content.ends_with('\n') {
            last.content.pop();
        }
    }
}

fn parse_marker(line: &str) -> Result<(String, Category), AssemblyError> {
    let malformed = || AssemblyError::MalformedMarker(line.to_string());

    let body = line
        .strip_prefix(MARKER_PREFIX)
        .and_then(|rest| rest.strip_suffix(MARKER_SUFFIX))
        .ok_or_else(malformed)?;
    let mut fields = body.split(' ');
    let id = fields
        .next()
        .and_then(|f| f.strip_prefix("id="))
        .filter(|id| !id.is_empty())
        .ok_or_else(malformed)?;
    let category = fields
        .next()
        .and_then(|f| f.strip_prefix("category="))
        .and_then(Category::parse)
        .ok_or_else(malformed)?;
    if fields.next().is_some() {
        return Err(malformed());
    }

    Ok((id.to_string(), category))
}
