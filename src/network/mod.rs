pub mod model;
pub mod network;
pub mod shared;
pub mod snapshot;
pub mod spec;

pub use model::Model;
pub use network::Network;
pub use shared::SharedNetwork;
pub use snapshot::NetworkSnapshot;
pub use spec::NetworkSpec;
