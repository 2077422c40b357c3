//! Unit tests for npc-schedule.

use npc_percept::{Conditions, SoundTypes};

use crate::{Category, ScheduleDef, ScheduleError, ScheduleRegistry, ScheduleTable, TaskAction, TaskDef};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn wait_schedule(name: &str) -> ScheduleDef {
    ScheduleDef::new(
        name,
        vec![TaskDef::new(TaskAction::WAIT, 1.0)],
        Conditions::NEW_ENEMY,
        SoundTypes::DANGER,
    )
    .unwrap()
}

// ── ScheduleDef ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod schedule_def {
    use super::*;

    #[test]
    fn rejects_empty_task_list() {
        let result = ScheduleDef::new(
            "Empty",
            vec![],
            Conditions::empty(),
            SoundTypes::empty(),
        );
        assert!(matches!(result, Err(ScheduleError::EmptySchedule { .. })));
    }

    #[test]
    fn task_at_bounds() {
        let def = wait_schedule("W");
        assert!(def.task_at(0).is_some());
        assert!(def.task_at(1).is_none());
        assert_eq!(def.len(), 1);
    }

    #[test]
    fn set_fail_round_trips_category() {
        let task = TaskDef::set_fail(Category::TAKE_COVER_FROM_ENEMY);
        assert_eq!(task.action, TaskAction::SET_FAIL_CATEGORY);
        assert_eq!(task.param_as_category(), Category::TAKE_COVER_FROM_ENEMY);

        let custom = TaskDef::set_fail(Category::custom(12));
        assert_eq!(custom.param_as_category(), Category::custom(12));
    }
}

// ── Action / category spaces ──────────────────────────────────────────────────

#[cfg(test)]
mod spaces {
    use super::*;

    #[test]
    fn custom_ranges_do_not_collide_with_engine() {
        assert!(TaskAction::WAIT.is_engine());
        assert!(!TaskAction::custom(0).is_engine());
        assert!(Category::FAIL.is_engine());
        assert!(!Category::custom(0).is_engine());
    }
}

// ── Registry resolution ───────────────────────────────────────────────────────

#[cfg(test)]
mod resolution {
    use super::*;

    #[test]
    fn every_engine_category_has_a_default() {
        let mut registry = ScheduleRegistry::new();
        let archetype = registry.add_archetype(ScheduleTable::builder().build()).unwrap();
        for category in Category::ENGINE_CATEGORIES {
            let id = registry.resolve_strict(archetype, category).unwrap();
            assert!(registry.try_schedule(id).is_ok());
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        let mut registry = ScheduleRegistry::new();
        let arch = registry.add_archetype(ScheduleTable::builder().build()).unwrap();
        let a = registry.resolve(arch, Category::STANDOFF);
        let b = registry.resolve(arch, Category::STANDOFF);
        assert_eq!(a, b);
    }

    #[test]
    fn override_chain() {
        let mut registry = ScheduleRegistry::new();
        let base_melee = registry.add_schedule(wait_schedule("BaseMelee"));
        let base_fail = registry.add_schedule(wait_schedule("BaseFail"));
        let child_melee = registry.add_schedule(wait_schedule("ChildMelee"));

        let base = registry
            .add_archetype(
                ScheduleTable::builder()
                    .entry(Category::MELEE_ATTACK1, base_melee)
                    .entry(Category::FAIL, base_fail)
                    .build(),
            )
            .unwrap();
        let child = registry
            .add_archetype(
                ScheduleTable::builder()
                    .parent(base)
                    .entry(Category::MELEE_ATTACK1, child_melee)
                    .build(),
            )
            .unwrap();

        // Child's own override wins.
        assert_eq!(registry.resolve(child, Category::MELEE_ATTACK1), child_melee);
        // Unlisted category inherits from the parent.
        assert_eq!(registry.resolve(child, Category::FAIL), base_fail);
        // Neither defines STANDOFF: falls to the built-in default — which is
        // distinct from anything either table registered.
        let standoff = registry.resolve(child, Category::STANDOFF);
        assert_ne!(standoff, base_melee);
        assert_ne!(standoff, base_fail);
        assert_ne!(standoff, child_melee);
        assert_eq!(standoff, registry.resolve(base, Category::STANDOFF));
    }

    #[test]
    fn custom_category_without_entry_is_unresolved() {
        let mut registry = ScheduleRegistry::new();
        let arch = registry.add_archetype(ScheduleTable::builder().build()).unwrap();
        let custom = Category::custom(7);

        let strict = registry.resolve_strict(arch, custom);
        assert!(matches!(strict, Err(ScheduleError::UnresolvedCategory(c)) if c == custom));

        // The lenient path degrades to stand-idle instead of failing.
        assert_eq!(registry.resolve(arch, custom), registry.stand_idle());
    }

    #[test]
    fn parent_must_be_registered_first() {
        let mut registry = ScheduleRegistry::new();
        let table = ScheduleTable::builder()
            .parent(npc_core::ArchetypeId(5))
            .build();
        assert!(matches!(
            registry.add_archetype(table),
            Err(ScheduleError::UnknownParent { .. })
        ));
    }
}
