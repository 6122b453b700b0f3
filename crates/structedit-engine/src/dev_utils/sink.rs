//! Building tree nodes out of parser events.

use structedit_syntax::{Event, parse};

use super::DataError;
use crate::model::ModelWriter;
use crate::tree::{NodeId, Position, Range, Selection, TEXT_NAME, Tree};

/// Selection marker positions collected while loading data, in document order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionMarkers {
    pub starts: Vec<Position>,
    pub ends: Vec<Position>,
}

impl SelectionMarkers {
    /// Pair the `n`th `[` with the `n`th `]`. `None` when there are no markers.
    pub fn into_selection(self, tree: &Tree) -> Result<Option<Selection>, DataError> {
        if self.starts.len() != self.ends.len() {
            return Err(DataError::UnbalancedSelection {
                starts: self.starts.len(),
                ends: self.ends.len(),
            });
        }
        if self.starts.is_empty() {
            return Ok(None);
        }

        let mut ranges = Vec::with_capacity(self.starts.len());
        for (start, end) in self.starts.into_iter().zip(self.ends) {
            if tree.compare(start, end) == Some(std::cmp::Ordering::Greater) {
                return Err(DataError::SelectionEndBeforeStart);
            }
            ranges.push(Range::new(tree, start, end));
        }
        Ok(Some(Selection::from_ranges(ranges, false)))
    }
}

/// Parse `data` and append the resulting nodes to `parent`.
///
/// Every element and text node is checked against the writer's schema.
pub fn parse_into(
    writer: &mut ModelWriter<'_>,
    parent: NodeId,
    data: &str,
) -> Result<SelectionMarkers, DataError> {
    let mut markers = SelectionMarkers::default();
    let mut open = vec![parent];

    for event in parse(data)? {
        let current = *open.last().unwrap_or(&parent);
        match event {
            Event::Start { name, attributes } => {
                check_allowed(writer, current, &name)?;
                let attributes: Vec<(&str, &str)> = attributes
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str()))
                    .collect();
                let element = writer.create_element(&name, &attributes);
                writer.append(element, current);
                open.push(element);
            }
            Event::Finish { .. } => {
                open.pop();
            }
            Event::Text(data) => {
                check_allowed(writer, current, TEXT_NAME)?;
                let text = writer.create_text(&data);
                writer.append(text, current);
            }
            Event::SelectionStart => markers
                .starts
                .push(Position::at_end(writer.tree(), current)),
            Event::SelectionEnd => markers.ends.push(Position::at_end(writer.tree(), current)),
        }
    }
    Ok(markers)
}

fn check_allowed(writer: &ModelWriter<'_>, parent: NodeId, child: &str) -> Result<(), DataError> {
    if writer.schema().check_child_in(writer.tree(), parent, child) {
        return Ok(());
    }
    Err(DataError::NotAllowed {
        child: child.to_string(),
        parent: writer.tree().schema_name(parent).to_string(),
    })
}
