/// Business logic on top of the storage traits
///
/// - `task_service`: Ownership-scoped task operations

pub mod task_service;
