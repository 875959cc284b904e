//! Descriptor traversal dispatcher.
//!
//! A resolution pass implements [`DescriptorVisitor`] for only the element
//! kinds it cares about; the remaining handlers default to no-ops. [`walk`]
//! drives the visitor over a descriptor — the descriptor node first, then
//! modules in declaration order, then resources in declaration order —
//! while [`walk_platform`] drives it over a deploy target's resource-type
//! declarations.
//!
//! Traversal itself never mutates anything: visitors receive shared
//! references and collect whatever scratch state they need, and the pass
//! rewrites the descriptor afterwards. A handler error aborts the
//! remaining traversal and propagates to the caller.

use crate::descriptor::{DeploymentDescriptor, Module, Resource};
use crate::error::Result;
use crate::platform::{Platform, ResourceTypeDeclaration};

/// Per-element-kind handlers for one traversal of a descriptor.
pub trait DescriptorVisitor {
    /// Visit the descriptor node itself.
    fn on_descriptor(&mut self, descriptor: &DeploymentDescriptor) -> Result<()> {
        let _ = descriptor;
        Ok(())
    }

    /// Visit one module.
    fn on_module(&mut self, descriptor: &DeploymentDescriptor, module: &Module) -> Result<()> {
        let _ = (descriptor, module);
        Ok(())
    }

    /// Visit one resource.
    fn on_resource(&mut self, descriptor: &DeploymentDescriptor, resource: &Resource) -> Result<()> {
        let _ = (descriptor, resource);
        Ok(())
    }

    /// Visit one resource-type declaration of a deploy target.
    fn on_resource_type(&mut self, declaration: &ResourceTypeDeclaration) -> Result<()> {
        let _ = declaration;
        Ok(())
    }
}

/// Visit the descriptor node, then each module and each resource in
/// declaration order.
pub fn walk<V: DescriptorVisitor + ?Sized>(
    descriptor: &DeploymentDescriptor,
    visitor: &mut V,
) -> Result<()> {
    visitor.on_descriptor(descriptor)?;
    for module in &descriptor.modules {
        visitor.on_module(descriptor, module)?;
    }
    for resource in &descriptor.resources {
        visitor.on_resource(descriptor, resource)?;
    }
    Ok(())
}

/// Visit each resource-type declaration of a deploy target in declaration
/// order.
pub fn walk_platform<V: DescriptorVisitor + ?Sized>(
    platform: &Platform,
    visitor: &mut V,
) -> Result<()> {
    for declaration in &platform.resource_types {
        visitor.on_resource_type(declaration)?;
    }
    Ok(())
}
