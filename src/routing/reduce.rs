//! Boundary reduction pass.
//!
//! # Responsibilities
//! - Drop everything a boundary emitted unless it produced a handler match
//!
//! # Design Decisions
//! - Runs strictly after the match pass, linear in the number of events
//! - Output buffer is append-only with a logical length; truncation is O(1)
//! - A handler inside a nested boundary satisfies every enclosing boundary

use crate::routing::error::LookupError;
use crate::routing::lookup::{MatchEvent, MatchedLayer};

/// Bookkeeping saved when a nested boundary opens.
#[derive(Debug, Clone, Copy)]
struct Frame {
    has_handler: bool,
    start: usize,
}

/// Reduce a raw match stream to the dispatch-ready layer sequence.
pub(crate) fn reduce<'r, H>(
    events: Vec<MatchEvent<'r, H>>,
) -> Result<Vec<MatchedLayer<'r, H>>, LookupError> {
    let mut buffer: Vec<MatchedLayer<'r, H>> = Vec::with_capacity(events.len());
    let mut len = 0;
    let mut frames: Vec<Frame> = Vec::new();
    let mut current = Frame {
        has_handler: false,
        start: 0,
    };

    for event in events {
        match event {
            MatchEvent::Layer(layer) => {
                if !layer.is_middleware {
                    current.has_handler = true;
                }
                if len < buffer.len() {
                    buffer[len] = layer;
                } else {
                    buffer.push(layer);
                }
                len += 1;
            }
            MatchEvent::BoundaryStart => {
                frames.push(current);
                current = Frame {
                    has_handler: false,
                    start: len,
                };
            }
            MatchEvent::BoundaryEnd => {
                if !current.has_handler {
                    len = current.start;
                }
                let saved = frames
                    .pop()
                    .ok_or(LookupError::Corrupted("boundary end without matching start"))?;
                current = Frame {
                    has_handler: saved.has_handler || current.has_handler,
                    start: saved.start,
                };
            }
        }
    }

    if !frames.is_empty() {
        return Err(LookupError::Corrupted("boundary left open at end of match stream"));
    }

    buffer.truncate(len);
    Ok(buffer)
}
