pub mod descriptor;
pub mod outputs;

pub use descriptor::VectorStoreDescriptor;
pub use outputs::StackOutputs;
