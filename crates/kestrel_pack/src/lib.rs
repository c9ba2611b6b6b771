//! The packed-netlist loader for the Kestrel netlist core.
//!
//! Reconstructs a validated clustered netlist from three inputs: the device
//! model (`kestrel_arch`), the atom netlist (`kestrel_atom`), and the packed
//! netlist document grouping atoms into clusters.
//!
//! # Pipeline
//!
//! 1. **Ingest** — parse the `<block>` tree, populate each cluster's pb tree
//!    and `pb_route` table, bind atoms to pbs, propagate net identities
//!    through internal pins
//! 2. **Extract** — walk external cluster pins, intern the inter-cluster
//!    nets, record drivers and sinks, check global-signal agreement
//! 3. **Mark** — identify constant-generator primitives and assert their
//!    outputs are flagged constant at the source
//!
//! # Usage
//!
//! ```ignore
//! use kestrel_pack::load_clustered_netlist;
//!
//! let loaded = load_clustered_netlist(&text, "design.net", &device, &atoms, &clocks)?;
//! assert_eq!(loaded.clusters.block_count(), expected_clusters);
//! ```

#![warn(missing_docs)]

pub mod bindings;
pub mod clustered;
pub mod constgen;
pub mod error;
pub mod extract;
pub mod ids;
pub mod ingest;
pub mod xml;

#[cfg(test)]
pub(crate) mod test_util;

pub use bindings::AtomBindings;
pub use clustered::{
    ClusterNet, ClusterPinRef, ClusteredBlock, ClusteredNetlist, Pb, PbRouteEntry,
};
pub use constgen::{mark_constant_generators, ConstantGenerator};
pub use error::PackError;
pub use extract::extract_cluster_nets;
pub use ids::{ClusterBlockId, ClusterNetId, PbId};
pub use ingest::{load_packed_netlist, ROOT_INSTANCE};

use kestrel_arch::DeviceModel;
use kestrel_atom::AtomNetlist;

/// Everything the loader produces: the clustered netlist, the atom bindings,
/// and the constant generators found.
#[derive(Debug)]
pub struct LoadedNetlist {
    /// The clustered netlist with populated routing and net tables.
    pub clusters: ClusteredNetlist,
    /// Atom-to-cluster bindings.
    pub bindings: AtomBindings,
    /// Constant-generator primitives found during the marking pass.
    pub constant_generators: Vec<ConstantGenerator>,
}

/// Runs the full loading pipeline: ingest, net extraction, and the
/// constant-generator check.
pub fn load_clustered_netlist(
    text: &str,
    file: &str,
    device: &DeviceModel,
    atoms: &AtomNetlist,
    circuit_clocks: &[String],
) -> Result<LoadedNetlist, PackError> {
    let (mut clusters, mut bindings) = load_packed_netlist(text, file, device, atoms)?;
    extract_cluster_nets(&mut clusters, device, atoms, &mut bindings, circuit_clocks, file)?;
    let constant_generators = mark_constant_generators(&clusters, device, atoms, file)?;
    Ok(LoadedNetlist {
        clusters,
        bindings,
        constant_generators,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{identity_atoms, test_device, IDENTITY_NET};

    #[test]
    fn full_pipeline_on_identity_design() {
        let device = test_device();
        let atoms = identity_atoms();
        let loaded =
            load_clustered_netlist(IDENTITY_NET, "identity.net", &device, &atoms, &[]).unwrap();

        assert_eq!(loaded.clusters.block_count(), 3);
        assert_eq!(loaded.clusters.net_count(), 2);
        assert!(loaded.constant_generators.is_empty());
        assert_eq!(loaded.bindings.bound_block_count(), 3);
        atoms.verify().unwrap();
    }

    #[test]
    fn pipeline_propagates_ingest_errors() {
        let device = test_device();
        let atoms = identity_atoms();
        let err = load_clustered_netlist("<nope/>", "bad.net", &device, &atoms, &[]).unwrap_err();
        assert!(matches!(err, PackError::Schema { .. }));
    }
}
