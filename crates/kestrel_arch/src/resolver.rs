//! Resolution of textual pin expressions against a pin graph.
//!
//! A packed netlist names the upstream driver of an internal pin with a
//! token of the form `port[idx]` or `port[idx]->interconnect`. The port is
//! looked up in a *scope*: the input and clock ports of the scope node
//! itself, then the output ports of the scope node's children under its
//! selected mode. (For a child's input or clock pin the scope is the parent
//! node; for a node's output pin the scope is the node itself.)

use crate::error::ArchError;
use crate::graph::PbGraph;
use crate::ids::{PbNodeId, PbPinId};
use kestrel_common::PortDirection;

/// The result of resolving a pin expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedPin {
    /// The matched pin; its raw ID is the pin-count-in-cluster index.
    pub pin: PbPinId,
    /// Index into the pin's outgoing edge list of the edge whose interconnect
    /// name matched, when the expression carried one.
    pub edge: Option<usize>,
}

/// Splits `port[idx]` into its name and bit index.
fn parse_pin_name(token: &str, whole: &str) -> Result<(String, usize), ArchError> {
    let open = token
        .find('[')
        .ok_or_else(|| ArchError::MalformedPinExpr(whole.to_string()))?;
    if !token.ends_with(']') || open == 0 {
        return Err(ArchError::MalformedPinExpr(whole.to_string()));
    }
    let name = &token[..open];
    let index = token[open + 1..token.len() - 1]
        .parse::<usize>()
        .map_err(|_| ArchError::MalformedPinExpr(whole.to_string()))?;
    Ok((name.to_string(), index))
}

/// Resolves a `port[idx]` / `port[idx]->interconnect` expression in the
/// scope of `node` under its selected `mode`.
///
/// The port name is searched among the scope node's own input and clock
/// ports, then among the output ports of its mode-selected children. The bit
/// index must be within the found port's width. If an interconnect suffix is
/// present, the matched pin must have an outgoing edge of that name
/// (interconnect names are unique within a scope by architecture, so the
/// first match is the only match).
pub fn resolve_pin_expr(
    graph: &PbGraph,
    node: PbNodeId,
    mode: usize,
    token: &str,
) -> Result<ResolvedPin, ArchError> {
    let (pin_part, interconnect) = match token.split_once("->") {
        Some((p, ic)) => (p, Some(ic)),
        None => (token, None),
    };
    let (port_name, index) = parse_pin_name(pin_part, token)?;

    let port = graph
        .find_port(node, PortDirection::Input, &port_name)
        .or_else(|| graph.find_port(node, PortDirection::Clock, &port_name))
        .or_else(|| {
            let children = &graph.node(node).children;
            children.get(mode).and_then(|mode_children| {
                mode_children
                    .iter()
                    .flat_map(|instances| instances.iter())
                    .find_map(|&child| graph.find_port(child, PortDirection::Output, &port_name))
            })
        })
        .ok_or_else(|| ArchError::UnknownPin(token.to_string()))?;

    if index >= port.pins.len() {
        return Err(ArchError::PinIndexOutOfRange {
            token: token.to_string(),
            width: port.pins.len(),
        });
    }
    let pin = port.pins[index];

    let edge = match interconnect {
        None => None,
        Some(name) => Some(
            graph
                .pin(pin)
                .edges
                .iter()
                .position(|e| e.interconnect == name)
                .ok_or_else(|| ArchError::UnknownInterconnect(token.to_string()))?,
        ),
    };

    Ok(ResolvedPin { pin, edge })
}
