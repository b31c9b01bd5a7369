//! Generated gRPC bindings used by hop.

pub mod sso {
    pub mod v1 {
        tonic::include_proto!("sso.v1");
    }
}

pub mod v1 {
    pub use crate::sso::v1::*;
}
