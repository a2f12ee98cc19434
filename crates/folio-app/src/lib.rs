// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod catalog;
pub mod contact;
pub mod filter;
pub mod focus;
pub mod ids;
pub mod markup;
pub mod modal;
pub mod model;
pub mod nav;
pub mod state;

pub use catalog::*;
pub use contact::*;
pub use filter::*;
pub use focus::*;
pub use ids::*;
pub use markup::*;
pub use modal::*;
pub use model::*;
pub use nav::*;
pub use state::*;
