// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Read-only views of complexes and their contact info, plus service probes.
pub mod complexes;
pub mod contact_info;
pub mod system;

pub use complexes::{complex_get, complex_list};
pub use contact_info::{contact_info_get, contact_info_list};
pub use system::{health, root};
