//! The packed-netlist ingestor.
//!
//! Consumes the hierarchical `<block>` document, reconstructs each cluster's
//! pb tree against the architecture's pin graph, fills the per-cluster
//! `pb_route` tables, and binds every atom block to the pb it was packed
//! into.
//!
//! Token routing rules, per pin of a port entry:
//! - top-level cluster input/clock bits name the inter-cluster atom net;
//! - leaf (primitive) output bits name the atom net they drive;
//! - every other bit carries a `port[idx]->interconnect` expression naming
//!   the upstream pin, resolved against the parent node for inputs/clocks
//!   and against the node itself for outputs.
//!
//! After all clusters are populated, net identities are pushed through the
//! `prev_pin` chains (the prev-pin graph follows architecture interconnects,
//! which are acyclic), and every atom block is checked to be bound.

use crate::bindings::AtomBindings;
use crate::clustered::{ClusteredBlock, ClusteredNetlist, Pb, PbRouteEntry};
use crate::error::PackError;
use crate::ids::{ClusterBlockId, ClusterNetId, PbId};
use crate::xml::{parse_document, XmlElement};
use kestrel_arch::{resolve_pin_expr, ArchError, DeviceModel, PbNodeId, PbType};
use kestrel_atom::{AtomBlockId, AtomNetId, AtomNetlist};
use kestrel_common::PortDirection;

/// The distinguished `instance` literal of the document root.
pub const ROOT_INSTANCE: &str = "FPGA_packed_netlist[0]";

/// Ingests a packed-netlist document.
///
/// Returns the populated clustered netlist and the atom bindings. The
/// returned netlist has complete `pb_route` tables; inter-cluster nets are
/// extracted by [`extract_cluster_nets`](crate::extract::extract_cluster_nets)
/// afterwards.
pub fn load_packed_netlist(
    text: &str,
    file: &str,
    device: &DeviceModel,
    atoms: &AtomNetlist,
) -> Result<(ClusteredNetlist, AtomBindings), PackError> {
    let doc = parse_document(text, file)?;
    let mut ingestor = Ingestor {
        file,
        device,
        atoms,
        clusters: ClusteredNetlist::new(),
        bindings: AtomBindings::new(),
    };
    ingestor.check_header(&doc)?;
    for (index, elem) in doc.children_named("block").enumerate() {
        ingestor.process_cluster(elem, index)?;
    }
    ingestor.propagate_nets()?;
    ingestor.check_atoms_bound()?;
    Ok((ingestor.clusters, ingestor.bindings))
}

struct Ingestor<'a> {
    file: &'a str,
    device: &'a DeviceModel,
    atoms: &'a AtomNetlist,
    clusters: ClusteredNetlist,
    bindings: AtomBindings,
}

impl<'a> Ingestor<'a> {
    fn check_header(&self, doc: &XmlElement) -> Result<(), PackError> {
        if doc.name != "block" {
            return Err(PackError::schema(
                self.file,
                doc.line,
                format!("root element must be <block>, found <{}>", doc.name),
            ));
        }
        let instance = doc.required_attr("instance", self.file)?;
        if instance != ROOT_INSTANCE {
            return Err(PackError::schema(
                self.file,
                doc.line,
                format!("root instance must be '{ROOT_INSTANCE}', found '{instance}'"),
            ));
        }
        // The top-level <inputs>/<outputs>/<clocks> lists are informational;
        // net identities are taken from the atom netlist.
        Ok(())
    }

    fn process_cluster(&mut self, elem: &XmlElement, index: usize) -> Result<(), PackError> {
        let device = self.device;
        let name = elem.required_attr("name", self.file)?.to_string();
        let instance = elem.required_attr("instance", self.file)?;
        let (type_name, slot) = self.parse_instance(instance, elem.line)?;
        if slot != index {
            return Err(PackError::shape(
                self.file,
                elem.line,
                format!("block '{name}' has instance '{instance}' but is cluster {index}"),
            ));
        }
        let type_index = device
            .find_block_type(&type_name)
            .ok_or_else(|| PackError::unknown(self.file, elem.line, "block type", &type_name))?;
        let block_type = device.block_type(type_index);
        let graph = &block_type.pb_graph;
        let external_pins = graph.node_pins(graph.root()).count();
        if external_pins != block_type.pins_per_instance() {
            return Err(PackError::shape(
                self.file,
                elem.line,
                format!(
                    "cluster type '{type_name}' exposes {external_pins} pins, expected {}",
                    block_type.pins_per_instance()
                ),
            ));
        }
        let cluster = self.clusters.add_block(ClusteredBlock {
            name,
            block_type: type_index,
            pbs: Vec::new(),
            pb_route: vec![PbRouteEntry::default(); graph.num_pins()],
            external_nets: vec![ClusterNetId::INVALID; external_pins],
        });
        self.process_pb(cluster, elem, graph.root(), &block_type.pb_type, None)?;
        Ok(())
    }

    /// Populates one pb from its `<block>` element: mode selection, port
    /// routing, then either leaf atom binding or recursion into child
    /// elements.
    fn process_pb(
        &mut self,
        cluster: ClusterBlockId,
        elem: &XmlElement,
        node: PbNodeId,
        pb_type: &'a PbType,
        parent: Option<(PbId, usize)>,
    ) -> Result<PbId, PackError> {
        let device = self.device;
        let graph = &device
            .block_type(self.clusters.block(cluster).block_type)
            .pb_graph;
        let gnode = graph.node(node);

        let name_attr = elem.required_attr("name", self.file)?;
        let name = (name_attr != "open").then(|| name_attr.to_string());
        let mode = self.select_mode(elem, pb_type)?;

        let children = gnode
            .children
            .get(mode)
            .map(|mode_children| {
                mode_children
                    .iter()
                    .map(|instances| vec![None; instances.len()])
                    .collect()
            })
            .unwrap_or_default();
        let pb_id = self.clusters.block_mut(cluster).add_pb(Pb {
            name: name.clone(),
            node,
            mode,
            parent: parent.map(|(p, _)| p),
            children,
            atom: AtomBlockId::INVALID,
        });

        self.process_ports(cluster, elem, node, mode, parent.map(|(_, m)| m))?;

        if gnode.is_primitive() {
            if let Some(atom_name) = &name {
                let atom = self.atoms.find_block(atom_name).ok_or_else(|| {
                    PackError::unknown(self.file, elem.line, "atom block", atom_name)
                })?;
                if self.bindings.atom_pb(atom).is_some() {
                    return Err(PackError::consistency(
                        self.file,
                        format!("atom block '{atom_name}' appears in more than one pb"),
                    ));
                }
                self.bindings.set_atom_pb(atom, cluster, pb_id);
                self.bindings.set_atom_clb(atom, cluster);
                self.clusters.block_mut(cluster).pb_mut(pb_id).atom = atom;
            }
            return Ok(pb_id);
        }

        for child_elem in elem.children_named("block") {
            let child_name = child_elem.required_attr("name", self.file)?;
            let instance = child_elem.required_attr("instance", self.file)?;
            let (child_type_name, slot) = self.parse_instance(instance, child_elem.line)?;
            let mode_def = &pb_type.modes[mode];
            let child_type = mode_def
                .children
                .iter()
                .position(|c| c.name == child_type_name)
                .ok_or_else(|| {
                    PackError::unknown(self.file, child_elem.line, "pb type", &child_type_name)
                })?;
            let instances = &gnode.children[mode][child_type];
            if slot >= instances.len() {
                return Err(PackError::shape(
                    self.file,
                    child_elem.line,
                    format!(
                        "instance '{instance}' is out of range ({} slots of '{child_type_name}')",
                        instances.len()
                    ),
                ));
            }
            if child_name == "open" {
                // An open slot is skipped unless it carries routing-only
                // output usage.
                let routed = child_elem
                    .child("outputs")
                    .is_some_and(|o| o.children_named("port").next().is_some());
                if !routed {
                    continue;
                }
            }
            if self.clusters.block(cluster).pb(pb_id).children[child_type][slot].is_some() {
                return Err(PackError::shape(
                    self.file,
                    child_elem.line,
                    format!("duplicate instance '{instance}'"),
                ));
            }
            let child_node = instances[slot];
            let child_pb = self.process_pb(
                cluster,
                child_elem,
                child_node,
                &mode_def.children[child_type],
                Some((pb_id, mode)),
            )?;
            self.clusters.block_mut(cluster).pb_mut(pb_id).children[child_type][slot] =
                Some(child_pb);
        }
        Ok(pb_id)
    }

    /// Routes the `<inputs>`, `<outputs>`, and `<clocks>` sections of one pb
    /// into the cluster's `pb_route` table.
    fn process_ports(
        &mut self,
        cluster: ClusterBlockId,
        elem: &XmlElement,
        node: PbNodeId,
        mode: usize,
        parent_mode: Option<usize>,
    ) -> Result<(), PackError> {
        let device = self.device;
        let graph = &device
            .block_type(self.clusters.block(cluster).block_type)
            .pb_graph;
        let gnode = graph.node(node);
        let is_root = gnode.parent.is_none();
        let is_leaf = gnode.is_primitive();

        let sections = [
            ("inputs", PortDirection::Input),
            ("outputs", PortDirection::Output),
            ("clocks", PortDirection::Clock),
        ];
        for (section_name, direction) in sections {
            let Some(section) = elem.child(section_name) else {
                continue;
            };
            for port_elem in section.children_named("port") {
                let port_name = port_elem.required_attr("name", self.file)?;
                let port = graph.find_port(node, direction, port_name).ok_or_else(|| {
                    PackError::unknown(self.file, port_elem.line, "port", port_name)
                })?;
                let tokens: Vec<&str> = port_elem.tokens().collect();
                if tokens.len() != port.pins.len() {
                    return Err(PackError::shape(
                        self.file,
                        port_elem.line,
                        format!(
                            "port '{port_name}' lists {} pins, expected {}",
                            tokens.len(),
                            port.pins.len()
                        ),
                    ));
                }
                for (bit, &token) in tokens.iter().enumerate() {
                    if token == "open" {
                        continue;
                    }
                    let pin = port.pins[bit];
                    let takes_net_name =
                        (direction.is_sink() && is_root) || (direction == PortDirection::Output && is_leaf);
                    if takes_net_name {
                        let net = self.atoms.find_net(token).ok_or_else(|| {
                            PackError::unknown(self.file, port_elem.line, "net", token)
                        })?;
                        self.clusters.block_mut(cluster).pb_route[pin.index()].atom_net = net;
                    } else {
                        let (scope, scope_mode) = if direction.is_sink() {
                            let parent_node =
                                gnode.parent.expect("non-root pb always has a parent");
                            (parent_node, parent_mode.unwrap_or(0))
                        } else {
                            (node, mode)
                        };
                        let resolved = resolve_pin_expr(graph, scope, scope_mode, token)
                            .map_err(|e| self.arch_error(port_elem.line, token, e))?;
                        if let Some((_, interconnect)) = token.split_once("->") {
                            // The named interconnect must actually reach the
                            // pin being routed (a fan-out interconnect has one
                            // edge per reachable sink, all under one name).
                            let reaches = graph
                                .pin(resolved.pin)
                                .edges
                                .iter()
                                .any(|e| e.interconnect == interconnect && e.sink == pin);
                            if !reaches {
                                return Err(PackError::unknown(
                                    self.file,
                                    port_elem.line,
                                    "interconnect",
                                    token,
                                ));
                            }
                        }
                        self.clusters.block_mut(cluster).pb_route[pin.index()].prev_pin =
                            Some(resolved.pin);
                    }
                }
            }
        }
        Ok(())
    }

    /// Matches the element's `mode` attribute against the pb type's modes.
    /// Primitives have no modes and ignore the attribute; a missing attribute
    /// is accepted when only one mode exists.
    fn select_mode(&self, elem: &XmlElement, pb_type: &PbType) -> Result<usize, PackError> {
        if pb_type.is_primitive() {
            return Ok(0);
        }
        match elem.attr("mode") {
            Some(mode_name) => pb_type
                .find_mode(mode_name)
                .ok_or_else(|| PackError::unknown(self.file, elem.line, "mode", mode_name)),
            None if pb_type.modes.len() == 1 => Ok(0),
            None => Err(PackError::schema(
                self.file,
                elem.line,
                format!(
                    "<block> of type '{}' is missing required attribute 'mode'",
                    pb_type.name
                ),
            )),
        }
    }

    /// Tokenizes `type[slot]`.
    fn parse_instance(&self, instance: &str, line: u32) -> Result<(String, usize), PackError> {
        let malformed = || {
            PackError::schema(
                self.file,
                line,
                format!("malformed instance '{instance}', expected 'type[slot]'"),
            )
        };
        let open = instance.find('[').ok_or_else(malformed)?;
        if !instance.ends_with(']') || open == 0 {
            return Err(malformed());
        }
        let slot = instance[open + 1..instance.len() - 1]
            .parse::<usize>()
            .map_err(|_| malformed())?;
        Ok((instance[..open].to_string(), slot))
    }

    fn arch_error(&self, line: u32, token: &str, err: ArchError) -> PackError {
        match err {
            ArchError::UnknownPin(_) => PackError::unknown(self.file, line, "pin", token),
            ArchError::UnknownInterconnect(_) => {
                PackError::unknown(self.file, line, "interconnect", token)
            }
            ArchError::PinIndexOutOfRange { .. } => {
                PackError::shape(self.file, line, format!("{err}"))
            }
            ArchError::MalformedPinExpr(_) => PackError::schema(self.file, line, format!("{err}")),
        }
    }

    /// Transitive fill: pins that only know their upstream pin inherit the
    /// upstream pin's net. Chains terminate at pins that carry a net directly
    /// (top-level inputs/clocks and leaf outputs) or at unrouted pins.
    fn propagate_nets(&mut self) -> Result<(), PackError> {
        for block_index in 0..self.clusters.block_count() {
            let num_pins = self.clusters.blocks[block_index].pb_route.len();
            for start in 0..num_pins {
                let entry = self.clusters.blocks[block_index].pb_route[start];
                if entry.atom_net.is_valid() || entry.prev_pin.is_none() {
                    continue;
                }
                let mut path = vec![start];
                let mut current = start;
                let net = loop {
                    let route = &self.clusters.blocks[block_index].pb_route;
                    let Some(prev) = route[current].prev_pin else {
                        break AtomNetId::INVALID;
                    };
                    let prev_index = prev.index();
                    if route[prev_index].atom_net.is_valid() {
                        break route[prev_index].atom_net;
                    }
                    path.push(prev_index);
                    current = prev_index;
                    if path.len() > num_pins {
                        return Err(PackError::consistency(
                            self.file,
                            format!(
                                "routing loop detected in cluster '{}'",
                                self.clusters.blocks[block_index].name
                            ),
                        ));
                    }
                };
                if net.is_valid() {
                    for &pin in &path {
                        self.clusters.blocks[block_index].pb_route[pin].atom_net = net;
                    }
                }
            }
        }
        Ok(())
    }

    fn check_atoms_bound(&self) -> Result<(), PackError> {
        for block in self.atoms.blocks() {
            if self.bindings.atom_pb(block).is_none() {
                return Err(PackError::consistency(
                    self.file,
                    format!(
                        "atom block '{}' was not packed into any cluster",
                        self.atoms.block_name(block)
                    ),
                ));
            }
        }
        Ok(())
    }
}
