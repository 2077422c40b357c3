//! Abstract schedule categories.
//!
//! A `Category` names a *kind* of plan ("melee attack", "fail", "standoff")
//! independent of any archetype.  Selection logic chooses a category; the
//! registry maps it to a concrete `ScheduleDef` through the archetype's
//! table chain.  Like task actions, the space is open: engine categories sit
//! below [`Category::ENGINE_LIMIT`] and each has a guaranteed built-in
//! default schedule; archetype-specific categories start at the limit and
//! must be covered by the archetype's own table (or an ancestor's).

/// An abstract, archetype-independent plan category.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Category(pub u16);

impl Category {
    /// Generic recovery plan after an unrecovered task failure.
    pub const FAIL: Category = Category(0);
    /// Stand in place, scanning for threats.
    pub const IDLE_STAND: Category = Category(1);
    /// Turn toward whatever raised the alert.
    pub const ALERT_FACE: Category = Category(2);
    /// Hold position while alert.
    pub const ALERT_STAND: Category = Category(3);
    /// React to the first sighting of a new enemy.
    pub const WAKE_ANGRY: Category = Category(4);
    /// Dive away from this tick's best heard danger sound.
    pub const TAKE_COVER_FROM_BEST_SOUND: Category = Category(5);
    /// Break line of sight with the current enemy.
    pub const TAKE_COVER_FROM_ENEMY: Category = Category(6);
    /// Close distance to the current enemy.
    pub const CHASE_ENEMY: Category = Category(7);
    /// Primary melee attack.
    pub const MELEE_ATTACK1: Category = Category(8);
    /// Primary ranged attack.
    pub const RANGE_ATTACK1: Category = Category(9);
    /// Secondary ranged attack.
    pub const RANGE_ATTACK2: Category = Category(10);
    /// Hold position when the enemy is known but unreachable/occluded.
    pub const STANDOFF: Category = Category(11);
    /// Celebrate a kill.
    pub const VICTORY_DANCE: Category = Category(12);
    /// Brief pain reaction that doesn't abandon the fight.
    pub const SMALL_FLINCH: Category = Category(13);
    /// Death plan.
    pub const DIE: Category = Category(14);

    /// Number of engine categories; also the first value available to
    /// archetype-defined categories.
    pub const ENGINE_LIMIT: u16 = 64;

    /// The `n`-th archetype-defined category.
    #[inline]
    pub const fn custom(n: u16) -> Category {
        Category(Self::ENGINE_LIMIT + n)
    }

    /// `true` if this category is engine-defined (and therefore always
    /// resolvable via a built-in default).
    #[inline]
    pub fn is_engine(self) -> bool {
        self.0 < Self::ENGINE_LIMIT
    }

    /// All engine categories, in declaration order.  Used by the registry to
    /// install built-in defaults.
    pub(crate) const ENGINE_CATEGORIES: [Category; 15] = [
        Category::FAIL,
        Category::IDLE_STAND,
        Category::ALERT_FACE,
        Category::ALERT_STAND,
        Category::WAKE_ANGRY,
        Category::TAKE_COVER_FROM_BEST_SOUND,
        Category::TAKE_COVER_FROM_ENEMY,
        Category::CHASE_ENEMY,
        Category::MELEE_ATTACK1,
        Category::RANGE_ATTACK1,
        Category::RANGE_ATTACK2,
        Category::STANDOFF,
        Category::VICTORY_DANCE,
        Category::SMALL_FLINCH,
        Category::DIE,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Category::FAIL => write!(f, "Fail"),
            Category::IDLE_STAND => write!(f, "IdleStand"),
            Category::ALERT_FACE => write!(f, "AlertFace"),
            Category::ALERT_STAND => write!(f, "AlertStand"),
            Category::WAKE_ANGRY => write!(f, "WakeAngry"),
            Category::TAKE_COVER_FROM_BEST_SOUND => write!(f, "TakeCoverFromBestSound"),
            Category::TAKE_COVER_FROM_ENEMY => write!(f, "TakeCoverFromEnemy"),
            Category::CHASE_ENEMY => write!(f, "ChaseEnemy"),
            Category::MELEE_ATTACK1 => write!(f, "MeleeAttack1"),
            Category::RANGE_ATTACK1 => write!(f, "RangeAttack1"),
            Category::RANGE_ATTACK2 => write!(f, "RangeAttack2"),
            Category::STANDOFF => write!(f, "Standoff"),
            Category::VICTORY_DANCE => write!(f, "VictoryDance"),
            Category::SMALL_FLINCH => write!(f, "SmallFlinch"),
            Category::DIE => write!(f, "Die"),
            Category(n) => write!(f, "Category({n})"),
        }
    }
}
