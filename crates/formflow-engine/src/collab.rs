//! External collaborators the engine consults but does not implement.
//!
//! Guard expressions (`happens`, `condition`) and dynamic identity
//! expressions such as `form.<field>` are opaque strings to the engine. A
//! deployment supplies a [`GuardEvaluator`] and an [`IdentityResolver`] that
//! understand them; no expression grammar is defined here. Closures of the
//! right shape implement each trait.

use formflow_core::App;
use formflow_core::task::{Branch, GotoTask};
use formflow_core::value::ValueContainer;

use crate::instance::Submission;

/// Identity alias that always means "whoever created the instance".
pub const INITIATOR_ALIAS: &str = "req.initiator";

/// Read-only view of an instance handed to collaborators.
#[derive(Debug, Clone, Copy)]
pub struct InstanceContext<'a> {
    pub creator: &'a str,
    pub current_step: &'a str,
    pub submissions: &'a [Submission],
}

impl<'a> InstanceContext<'a> {
    /// Resolve a built-in stanza: `current_step` or `req.creator`.
    pub fn lookup(&self, stanza: &str) -> Option<&'a str> {
        match stanza {
            "current_step" => Some(self.current_step),
            "req.creator" => Some(self.creator),
            _ => None,
        }
    }

    /// The most recently submitted value for a field.
    pub fn latest_value(&self, section: &str, field_id: &str) -> Option<&'a ValueContainer> {
        self.submissions
            .iter()
            .rev()
            .filter_map(|s| s.data.get(section))
            .find_map(|values| values.iter().find(|v| v.id() == field_id))
    }
}

/// Decides guard expressions.
pub trait GuardEvaluator {
    fn evaluate(&self, expression: &str, ctx: &InstanceContext<'_>) -> bool;

    /// Whether a parallel branch would run.
    fn branch_active(&self, branch: &Branch, ctx: &InstanceContext<'_>) -> bool {
        self.evaluate(&branch.happens, ctx)
    }

    /// Whether a goto task would jump.
    fn should_jump(&self, goto: &GotoTask, ctx: &InstanceContext<'_>) -> bool {
        self.evaluate(&goto.condition, ctx)
    }
}

impl<F> GuardEvaluator for F
where
    F: Fn(&str, &InstanceContext<'_>) -> bool,
{
    fn evaluate(&self, expression: &str, ctx: &InstanceContext<'_>) -> bool {
        self(expression, ctx)
    }
}

/// Maps an identity expression to a concrete user.
pub trait IdentityResolver {
    fn resolve(&self, expression: &str, ctx: &InstanceContext<'_>) -> Option<String>;
}

impl<F> IdentityResolver for F
where
    F: Fn(&str, &InstanceContext<'_>) -> Option<String>,
{
    fn resolve(&self, expression: &str, ctx: &InstanceContext<'_>) -> Option<String> {
        self(expression, ctx)
    }
}

/// Resolves [`INITIATOR_ALIAS`] to the creator and every other expression to
/// itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralIdentityResolver;

impl IdentityResolver for LiteralIdentityResolver {
    fn resolve(&self, expression: &str, ctx: &InstanceContext<'_>) -> Option<String> {
        if expression == INITIATOR_ALIAS {
            Some(ctx.creator.to_string())
        } else {
            Some(expression.to_string())
        }
    }
}

/// Gate on instance creation.
pub trait StartPolicy {
    fn can_start(&self, app: &App, user: &str) -> bool;
}

impl<F> StartPolicy for F
where
    F: Fn(&App, &str) -> bool,
{
    fn can_start(&self, app: &App, user: &str) -> bool {
        self(app, user)
    }
}

/// Defers to [`App::can_start`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl StartPolicy for AllowAll {
    fn can_start(&self, app: &App, user: &str) -> bool {
        app.can_start(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use formflow_core::submission::SectionValues;

    fn submission(step: &str, name: &str) -> Submission {
        let mut data = SectionValues::new();
        data.insert(
            "S1".to_string(),
            vec![ValueContainer::Text {
                id: "Name".into(),
                value: name.into(),
            }],
        );
        Submission {
            step: step.into(),
            user: "u".into(),
            data,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn lookup_builtin_stanzas() {
        let ctx = InstanceContext {
            creator: "ian@test.com",
            current_step: "Approve",
            submissions: &[],
        };
        assert_eq!(ctx.lookup("current_step"), Some("Approve"));
        assert_eq!(ctx.lookup("req.creator"), Some("ian@test.com"));
        assert_eq!(ctx.lookup("req.initiator"), None);
    }

    #[test]
    fn latest_value_prefers_newest_submission() {
        let subs = vec![submission("start", "Jane"), submission("T1", "Janet")];
        let ctx = InstanceContext {
            creator: "u",
            current_step: "T2",
            submissions: &subs,
        };
        assert_eq!(ctx.latest_value("S1", "Name").and_then(|v| v.as_text()), Some("Janet"));
        assert!(ctx.latest_value("S2", "Name").is_none());
    }

    #[test]
    fn plain_functions_act_as_guards() {
        fn guard(expr: &str, _: &InstanceContext<'_>) -> bool {
            expr == "TRUE"
        }
        let ctx = InstanceContext {
            creator: "u",
            current_step: "start",
            submissions: &[],
        };
        assert!(guard.branch_active(&Branch::new("b", "TRUE", vec![]), &ctx));
        assert!(!guard.branch_active(&Branch::new("b", "IT_Assets_Required=1", vec![]), &ctx));
    }

    #[test]
    fn literal_resolver_expands_initiator_only() {
        let ctx = InstanceContext {
            creator: "ian@test.com",
            current_step: "start",
            submissions: &[],
        };
        let r = LiteralIdentityResolver;
        assert_eq!(r.resolve("req.initiator", &ctx).as_deref(), Some("ian@test.com"));
        assert_eq!(
            r.resolve("form.reporting manager", &ctx).as_deref(),
            Some("form.reporting manager")
        );
    }
}
