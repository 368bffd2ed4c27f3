//! Surface geometry generation
//!
//! Produces the unit icosphere the planet surface is built from. Heights are
//! applied afterwards by [`crate::mesh::SurfaceMesh::generate`].

mod icosahedron;

pub use icosahedron::UnitIcosphere;
