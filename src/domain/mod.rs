// Domain layer: normalized item models and the collaborator ports injected into the importer.

pub mod model;
pub mod ports;
