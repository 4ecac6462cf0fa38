/// Interfaces layer - external entry points
///
/// ## Modules
/// - `cli`: command-line simulation driver (the order entry collaborator)

pub mod cli;
