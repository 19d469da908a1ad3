//! Component registry.

use super::{Component, ComponentKind};
use crate::{Error, Result};
use std::collections::BTreeSet;

/// The set of component kinds a report accepts.
///
/// Only registered kinds are guaranteed to survive the cache round trip, so
/// [`ComponentBuilder::add_component`](crate::report::ComponentBuilder::add_component)
/// rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRegistry {
    kinds: BTreeSet<ComponentKind>,
}

impl ComponentRegistry {
    /// Every kind this crate knows how to cache and render.
    pub fn standard() -> Self {
        Self {
            kinds: ComponentKind::ALL.iter().copied().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            kinds: BTreeSet::new(),
        }
    }

    pub fn with(mut self, kind: ComponentKind) -> Self {
        self.kinds.insert(kind);
        self
    }

    pub fn without(mut self, kind: ComponentKind) -> Self {
        self.kinds.remove(&kind);
        self
    }

    pub fn permits(&self, kind: ComponentKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.kinds.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn check(&self, component: &Component) -> Result<()> {
        let kind = component.kind();
        if self.permits(kind) {
            Ok(())
        } else {
            Err(Error::InvalidComponent {
                kind: kind.to_string(),
            })
        }
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Chart, ChartKind, Text, TextLevel};

    #[test]
    fn test_standard_registry_admits_all_kinds() {
        let registry = ComponentRegistry::standard();
        assert_eq!(registry.len(), 10);
        assert!(ComponentKind::ALL.iter().all(|k| registry.permits(*k)));
    }

    #[test]
    fn test_narrowed_registry_rejects() {
        let registry = ComponentRegistry::standard().without(ComponentKind::BarStackChart);
        let chart: Component = Chart::new(ChartKind::BarStack, "Load").into();
        let err = registry.check(&chart).unwrap_err();
        assert_eq!(err.to_string(), "bar_stack_chart is not a valid report component!");
        assert!(registry.check(&Text::new(TextLevel::P, "ok").into()).is_ok());
        assert!(ComponentRegistry::empty().with(ComponentKind::Meta).permits(ComponentKind::Meta));
    }
}
