//! # MTA Descriptor Resolution Library
//!
//! This library provides the core functionality for resolving and
//! rewriting multi-module application (MTA) deployment descriptors. It is
//! designed to be used by the `mta-resolve` command-line tool but can also
//! be integrated into deployers that need the resolution pipeline without
//! the CLI front end.
//!
//! ## Quick Example
//!
//! ```
//! use mta_resolve::descriptor;
//! use mta_resolve::passes::DescriptorResolver;
//! use mta_resolve::platform::CloudTarget;
//!
//! let yaml = r#"
//! id: com.example.shop
//! version: 1.0.0
//! modules:
//!   - name: web
//!     type: nodejs
//!     requires:
//!       - db
//! resources:
//!   - name: db
//!     type: hdi-container
//! "#;
//!
//! let parsed = descriptor::parse(yaml).unwrap();
//! let resolver = DescriptorResolver::new(CloudTarget::new("acme", "prod"));
//! let resolved = resolver.resolve(parsed).unwrap();
//! assert_eq!(resolved.resources.len(), 1);
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Descriptor (`descriptor`)**: the in-memory model of one MTA's
//!   modules, resources, and properties for one deployment operation.
//! - **Traversal (`visitor`)**: a per-element-kind dispatch over a
//!   descriptor, letting each pass implement only the handlers it needs.
//! - **Filters and references (`filter`, `reference`, `store`)**: parsing
//!   a reference resource into lookup criteria, querying the
//!   configuration-entry store, and materializing matches into resources.
//! - **Passes (`passes`)**: the pipeline that rewrites the descriptor —
//!   user-provided service synthesis, configuration-reference resolution,
//!   and blue/green zero-downtime appending.
//! - **Platform (`platform`, `builders`)**: deploy-target value objects,
//!   the resource-type table, and the small builders shared by the passes.
//!
//! ## Execution Flow
//!
//! The main entry point is `passes::DescriptorResolver`, which executes
//! the following high-level steps:
//!
//! 1.  **Validate**: reject unsupported descriptor schema versions.
//! 2.  **User-provided services**: synthesize requested services and wire
//!     their modules to them.
//! 3.  **Reference resolution**: resolve every configuration reference
//!     against the entry store and splice the results into the resource
//!     list, enforcing the single-match invariant.
//! 4.  **Blue/green appending**: when a deployment color is set, duplicate
//!     zero-downtime containers, rewire their consumers, and color every
//!     application name.
//!
//! The resolved descriptor is handed to the downstream cloud-model
//! builder; this library never talks to the platform itself.

pub mod builders;
pub mod descriptor;
pub mod error;
pub mod filter;
pub mod keys;
pub mod passes;
pub mod platform;
pub mod reference;
pub mod store;
pub mod visitor;

#[cfg(test)]
mod descriptor_proptest;
