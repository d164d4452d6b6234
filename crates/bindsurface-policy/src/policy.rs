//! Ordered exposure policy.

use bindsurface_core::{Access, ConfigurationError};

use crate::{PolicyRule, Target};

/// An ordered rule sequence whose first rule is [`PolicyRule::DefaultDenyAll`].
///
/// Order is precedence: a later rule overrides an earlier one for every
/// entity both match. Rule indices reported by the resolver are positions in
/// this sequence.
///
/// # Example
///
/// ```
/// use bindsurface_core::Access;
/// use bindsurface_policy::{Policy, PolicyRule};
///
/// let mut policy = Policy::new();
/// policy
///     .push(PolicyRule::include("Faunus::point")?)
///     .push(PolicyRule::ExcludeAccess(Access::Private));
/// assert_eq!(policy.len(), 3);
/// # Ok::<(), bindsurface_core::ConfigurationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    rules: Vec<PolicyRule>,
}

impl Default for Policy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy {
    /// A policy that hides everything.
    pub fn new() -> Self {
        Self {
            rules: vec![PolicyRule::DefaultDenyAll],
        }
    }

    /// Use `rules` verbatim.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::MissingDefaultRule`] unless the first rule is
    /// [`PolicyRule::DefaultDenyAll`].
    pub fn from_rules(rules: Vec<PolicyRule>) -> Result<Self, ConfigurationError> {
        match rules.first() {
            Some(PolicyRule::DefaultDenyAll) => Ok(Self { rules }),
            _ => Err(ConfigurationError::MissingDefaultRule),
        }
    }

    /// Build the conventional policy: default deny, then `classes` and
    /// `declarations` included, then `hidden` excluded, then one access
    /// exclusion per entry of `hidden_access`.
    ///
    /// Access exclusions come last so they win over every include.
    pub fn conventional<C, D, H, A>(
        classes: C,
        declarations: D,
        hidden: H,
        hidden_access: A,
    ) -> Result<Self, ConfigurationError>
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
        H: IntoIterator,
        H::Item: AsRef<str>,
        A: IntoIterator<Item = Access>,
    {
        let mut policy = Self::new();
        for target in classes {
            policy.push(PolicyRule::Include(Target::parse(target.as_ref())?));
        }
        for target in declarations {
            policy.push(PolicyRule::Include(Target::parse(target.as_ref())?));
        }
        for target in hidden {
            policy.push(PolicyRule::Exclude(Target::parse(target.as_ref())?));
        }
        for access in hidden_access {
            policy.push(PolicyRule::ExcludeAccess(access));
        }
        Ok(policy)
    }

    /// Append a rule.
    pub fn push(&mut self, rule: PolicyRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Append an include of a name or glob.
    pub fn include(&mut self, target: &str) -> Result<&mut Self, ConfigurationError> {
        Ok(self.push(PolicyRule::include(target)?))
    }

    /// Append an exclude of a name or glob.
    pub fn exclude(&mut self, target: &str) -> Result<&mut Self, ConfigurationError> {
        Ok(self.push(PolicyRule::exclude(target)?))
    }

    pub fn exclude_access(&mut self, access: Access) -> &mut Self {
        self.push(PolicyRule::ExcludeAccess(access))
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    pub fn get(&self, index: usize) -> Option<&PolicyRule> {
        self.rules.get(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always false: a policy holds at least the default rule.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
