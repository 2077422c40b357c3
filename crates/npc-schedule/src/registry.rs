//! `ScheduleRegistry` — the arena that owns every `ScheduleDef` and
//! `ScheduleTable` for a session.
//!
//! # Identity
//!
//! Definitions are addressed by `ScheduleId` (arena index) and tables by
//! `ArchetypeId`.  Both are stable for the registry's lifetime, which is the
//! process/session: registration happens once at startup, the registry is
//! never mutated during simulation, and persistence stores *categories* so a
//! reload against a freshly built registry re-resolves cleanly.
//!
//! # Built-in defaults
//!
//! Every engine [`Category`] gets a default schedule installed at
//! construction, so resolution over engine categories always terminates.
//! The defaults are deliberately inert (stop, face, wait) — real movement and
//! attack content is archetype business — but they carry the interrupt masks
//! the category implies, so even a defaulted agent reacts to new enemies,
//! damage, and danger sounds.

use npc_core::{ArchetypeId, ScheduleId};
use npc_percept::{Conditions, SoundTypes};
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::{Category, ScheduleDef, ScheduleError, ScheduleResult, ScheduleTable, TaskAction, TaskDef};

pub struct ScheduleRegistry {
    defs: Vec<ScheduleDef>,
    tables: Vec<ScheduleTable>,
    defaults: FxHashMap<Category, ScheduleId>,
    /// Last-resort plan substituted when resolution exhausts the chain.
    stand_idle: ScheduleId,
}

impl ScheduleRegistry {
    /// Create a registry with built-in defaults for every engine category.
    pub fn new() -> Self {
        let mut registry = Self {
            defs: Vec::new(),
            tables: Vec::new(),
            defaults: FxHashMap::default(),
            stand_idle: ScheduleId::INVALID,
        };
        registry.install_defaults();
        registry
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Add a schedule definition; returns its stable identity.
    pub fn add_schedule(&mut self, def: ScheduleDef) -> ScheduleId {
        let id = ScheduleId(self.defs.len() as u32);
        self.defs.push(def);
        id
    }

    /// Register an archetype's table; returns its stable identity.
    ///
    /// Parents must be registered before children, which also rules out
    /// cycles in the fallback chain.
    pub fn add_archetype(&mut self, table: ScheduleTable) -> ScheduleResult<ArchetypeId> {
        if let Some(parent) = table.parent {
            if parent.index() >= self.tables.len() {
                return Err(ScheduleError::UnknownParent { parent });
            }
        }
        let id = ArchetypeId(self.tables.len() as u16);
        self.tables.push(table);
        Ok(id)
    }

    // ── Access ────────────────────────────────────────────────────────────

    /// The definition behind `id`.
    ///
    /// # Panics
    /// Panics if `id` did not come from this registry.
    #[inline]
    pub fn schedule(&self, id: ScheduleId) -> &ScheduleDef {
        &self.defs[id.index()]
    }

    /// Fallible lookup for callers holding untrusted IDs (e.g. snapshots).
    pub fn try_schedule(&self, id: ScheduleId) -> ScheduleResult<&ScheduleDef> {
        self.defs.get(id.index()).ok_or(ScheduleError::UnknownSchedule(id))
    }

    pub fn table(&self, archetype: ArchetypeId) -> ScheduleResult<&ScheduleTable> {
        self.tables
            .get(archetype.index())
            .ok_or(ScheduleError::UnknownArchetype(archetype))
    }

    /// The guaranteed minimal "stand idle" plan.
    #[inline]
    pub fn stand_idle(&self) -> ScheduleId {
        self.stand_idle
    }

    // ── Resolution ────────────────────────────────────────────────────────

    /// Resolve `category` through the archetype chain, then the built-in
    /// defaults.  Pure: no side effects, same inputs → same identity.
    pub fn resolve_strict(
        &self,
        archetype: ArchetypeId,
        category: Category,
    ) -> ScheduleResult<ScheduleId> {
        let mut cursor = Some(archetype);
        while let Some(arch) = cursor {
            let table = self.table(arch)?;
            if let Some(id) = table.lookup(category) {
                return Ok(id);
            }
            cursor = table.parent;
        }
        self.defaults
            .get(&category)
            .copied()
            .ok_or(ScheduleError::UnresolvedCategory(category))
    }

    /// Engine-facing resolution: never fails.  An unresolved category is a
    /// configuration defect — it is logged and the stand-idle plan is
    /// substituted, because an agent with no plan stalls permanently.
    pub fn resolve(&self, archetype: ArchetypeId, category: Category) -> ScheduleId {
        match self.resolve_strict(archetype, category) {
            Ok(id) => id,
            Err(err) => {
                warn!(%archetype, %category, %err, "substituting stand-idle plan");
                self.stand_idle
            }
        }
    }

    // ── Built-in defaults ─────────────────────────────────────────────────

    fn install_defaults(&mut self) {
        // Masks shared by several defaults.  The idle mask is broad: an
        // unconfigured agent should still notice everything important.
        let idle_interrupts = Conditions::NEW_ENEMY
            | Conditions::SEE_ENEMY
            | Conditions::LIGHT_DAMAGE
            | Conditions::HEAVY_DAMAGE
            | Conditions::HEAR_SOUND
            | Conditions::PROVOKED
            | Conditions::CLIENT_PUSH;
        let idle_sounds = SoundTypes::COMBAT
            | SoundTypes::WORLD
            | SoundTypes::PLAYER
            | SoundTypes::DANGER;
        let combat_interrupts = Conditions::NEW_ENEMY
            | Conditions::ENEMY_DEAD
            | Conditions::HEAVY_DAMAGE;
        let danger_only = SoundTypes::DANGER;

        let stop = TaskDef::bare(TaskAction::STOP_MOVING);
        let face = TaskDef::bare(TaskAction::FACE_ENEMY);
        let wait = |secs: f32| TaskDef::new(TaskAction::WAIT, secs);

        // Each engine category gets its own named definition so logs point at
        // the category that fell through.
        for category in Category::ENGINE_CATEGORIES {
            let def = match category {
                Category::FAIL => ScheduleDef::new(
                    "DefaultFail",
                    vec![stop, wait(2.0)],
                    Conditions::CAN_RANGE_ATTACK1 | Conditions::CAN_MELEE_ATTACK1,
                    SoundTypes::empty(),
                ),
                Category::IDLE_STAND => ScheduleDef::new(
                    "DefaultIdleStand",
                    vec![stop, wait(5.0)],
                    idle_interrupts,
                    idle_sounds,
                ),
                Category::ALERT_FACE => ScheduleDef::new(
                    "DefaultAlertFace",
                    vec![stop, face],
                    Conditions::NEW_ENEMY
                        | Conditions::SEE_ENEMY
                        | Conditions::LIGHT_DAMAGE
                        | Conditions::HEAVY_DAMAGE
                        | Conditions::PROVOKED,
                    SoundTypes::empty(),
                ),
                Category::ALERT_STAND => ScheduleDef::new(
                    "DefaultAlertStand",
                    vec![stop, wait(20.0)],
                    idle_interrupts | Conditions::PROVOKED,
                    idle_sounds,
                ),
                Category::WAKE_ANGRY => ScheduleDef::new(
                    "DefaultWakeAngry",
                    vec![stop, face],
                    Conditions::empty(),
                    SoundTypes::empty(),
                ),
                Category::TAKE_COVER_FROM_BEST_SOUND => ScheduleDef::new(
                    "DefaultTakeCoverFromBestSound",
                    vec![stop, TaskDef::bare(TaskAction::FACE_BEST_SOUND), wait(2.0)],
                    Conditions::empty(),
                    SoundTypes::empty(),
                ),
                Category::TAKE_COVER_FROM_ENEMY => ScheduleDef::new(
                    "DefaultTakeCoverFromEnemy",
                    vec![stop, wait(1.0)],
                    combat_interrupts,
                    danger_only,
                ),
                Category::CHASE_ENEMY => ScheduleDef::new(
                    "DefaultChaseEnemy",
                    vec![stop, face, wait(1.0)],
                    combat_interrupts
                        | Conditions::CAN_RANGE_ATTACK1
                        | Conditions::CAN_MELEE_ATTACK1
                        | Conditions::TASK_FAILED,
                    danger_only,
                ),
                Category::MELEE_ATTACK1 => ScheduleDef::new(
                    "DefaultMeleeAttack1",
                    vec![stop, face, wait(0.5)],
                    combat_interrupts | Conditions::ENEMY_OCCLUDED,
                    danger_only,
                ),
                Category::RANGE_ATTACK1 => ScheduleDef::new(
                    "DefaultRangeAttack1",
                    vec![stop, face, wait(1.0)],
                    combat_interrupts | Conditions::ENEMY_OCCLUDED | Conditions::NO_AMMO,
                    danger_only,
                ),
                Category::RANGE_ATTACK2 => ScheduleDef::new(
                    "DefaultRangeAttack2",
                    vec![stop, face, wait(1.0)],
                    combat_interrupts | Conditions::ENEMY_OCCLUDED | Conditions::NO_AMMO,
                    danger_only,
                ),
                Category::STANDOFF => ScheduleDef::new(
                    "DefaultStandoff",
                    vec![stop, wait(2.0)],
                    combat_interrupts
                        | Conditions::CAN_RANGE_ATTACK1
                        | Conditions::CAN_MELEE_ATTACK1
                        | Conditions::HEAR_SOUND,
                    danger_only,
                ),
                Category::VICTORY_DANCE => ScheduleDef::new(
                    "DefaultVictoryDance",
                    vec![stop, wait(3.0)],
                    Conditions::NEW_ENEMY,
                    SoundTypes::empty(),
                ),
                Category::SMALL_FLINCH => ScheduleDef::new(
                    "DefaultSmallFlinch",
                    vec![stop, wait(0.5)],
                    Conditions::empty(),
                    SoundTypes::empty(),
                ),
                Category::DIE => ScheduleDef::new(
                    "DefaultDie",
                    vec![stop, wait(0.1)],
                    Conditions::empty(),
                    SoundTypes::empty(),
                ),
                other => ScheduleDef::new(
                    format!("Default{other}"),
                    vec![stop, wait(1.0)],
                    idle_interrupts,
                    idle_sounds,
                ),
            };
            // Defaults are built from literal non-empty task lists above.
            let def = def.expect("built-in default schedules are never empty");
            let id = self.add_schedule(def);
            self.defaults.insert(category, id);

            if category == Category::IDLE_STAND {
                self.stand_idle = id;
            }
        }
    }
}

impl Default for ScheduleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
