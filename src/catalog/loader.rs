//! Built-in default catalog content.
//!
//! A real deployment would load this from external data files (spec §1
//! treats the catalog as an injected collaborator); this loader constructs
//! an equivalent in-memory roster so the core is exercisable standalone.

use std::collections::HashMap;

use crate::status_effect::StatusKind;

use super::types::*;
use super::Catalog;

fn ability(
    id: &str,
    name: &str,
    category: AbilityCategory,
    target: TargetKind,
    unlock_at: u32,
    order: u32,
    cooldown: u32,
    params: AbilityParams,
) -> AbilityDef {
    AbilityDef {
        id: id.to_string(),
        name: name.to_string(),
        category,
        target,
        unlock_at,
        order,
        cooldown,
        params,
    }
}

fn params(base_amount: f64) -> AbilityParams {
    AbilityParams {
        base_amount,
        ..Default::default()
    }
}

fn classes() -> Vec<ClassDef> {
    vec![
        ClassDef {
            id: "warrior".into(),
            name: "Warrior".into(),
            abilities: vec![
                ability(
                    "slash",
                    "Slash",
                    AbilityCategory::Attack,
                    TargetKind::Monster,
                    1,
                    10,
                    0,
                    params(33.0),
                ),
                ability(
                    "cleave",
                    "Cleave",
                    AbilityCategory::Attack,
                    TargetKind::Multi,
                    2,
                    11,
                    1,
                    params(20.0),
                ),
                ability(
                    "shield_wall",
                    "Shield Wall",
                    AbilityCategory::Defense,
                    TargetKind::SelfTarget,
                    1,
                    50,
                    3,
                    AbilityParams {
                        status: Some(StatusKind::Shielded),
                        status_magnitude: 5.0,
                        status_turns: 2,
                        ..Default::default()
                    },
                ),
            ],
        },
        ClassDef {
            id: "wizard".into(),
            name: "Wizard".into(),
            abilities: vec![
                ability(
                    "fireball",
                    "Fireball",
                    AbilityCategory::Attack,
                    TargetKind::Monster,
                    1,
                    20,
                    0,
                    params(35.0),
                ),
                ability(
                    "frost_bolt",
                    "Frost Bolt",
                    AbilityCategory::Attack,
                    TargetKind::Single,
                    2,
                    21,
                    1,
                    AbilityParams {
                        base_amount: 18.0,
                        status: Some(StatusKind::Weakened),
                        status_magnitude: 0.2,
                        status_turns: 2,
                        ..Default::default()
                    },
                ),
            ],
        },
        ClassDef {
            id: "priest".into(),
            name: "Priest".into(),
            abilities: vec![
                ability(
                    "heal",
                    "Heal",
                    AbilityCategory::Heal,
                    TargetKind::Single,
                    1,
                    30,
                    0,
                    params(9999.0),
                ),
                ability(
                    "group_heal",
                    "Group Heal",
                    AbilityCategory::Heal,
                    TargetKind::Multi,
                    2,
                    31,
                    2,
                    AbilityParams {
                        base_amount: 20.0,
                        exclude_warlocks: true,
                        ..Default::default()
                    },
                ),
            ],
        },
        ClassDef {
            id: "assassin".into(),
            name: "Assassin".into(),
            abilities: vec![
                ability(
                    "poison_strike",
                    "Poison Strike",
                    AbilityCategory::Attack,
                    TargetKind::Single,
                    1,
                    5,
                    2,
                    AbilityParams {
                        base_amount: 15.0,
                        status: Some(StatusKind::Poison),
                        status_magnitude: 5.0,
                        status_turns: 3,
                        ..Default::default()
                    },
                ),
                ability(
                    "backstab",
                    "Backstab",
                    AbilityCategory::Attack,
                    TargetKind::Single,
                    2,
                    6,
                    2,
                    params(40.0),
                ),
            ],
        },
    ]
}

fn races() -> Vec<RaceDef> {
    vec![
        RaceDef {
            id: "rockhewn".into(),
            name: "Rockhewn".into(),
            racial: RacialAbilityDef {
                id: "stone_resolve".into(),
                name: "Stone Resolve".into(),
                usage: RacialUsage::PerGame,
                max_uses: 1,
                params: AbilityParams {
                    status: Some(StatusKind::ImmuneNextDamage),
                    ..Default::default()
                },
            },
        },
        RaceDef {
            id: "skeleton".into(),
            name: "Skeleton".into(),
            racial: RacialAbilityDef {
                id: "undying".into(),
                name: "Undying".into(),
                usage: RacialUsage::Passive,
                max_uses: 1,
                params: AbilityParams::default(),
            },
        },
        RaceDef {
            id: "human".into(),
            name: "Human".into(),
            racial: RacialAbilityDef {
                id: "adaptability".into(),
                name: "Adaptability".into(),
                usage: RacialUsage::PerGame,
                max_uses: 1,
                params: AbilityParams::default(),
            },
        },
        RaceDef {
            id: "crestfallen".into(),
            name: "Crestfallen".into(),
            racial: RacialAbilityDef {
                id: "keen_senses".into(),
                name: "Keen Senses".into(),
                usage: RacialUsage::Passive,
                max_uses: 0,
                params: AbilityParams::default(),
            },
        },
        RaceDef {
            id: "kinfolk".into(),
            name: "Kinfolk".into(),
            racial: RacialAbilityDef {
                id: "blood_mend".into(),
                name: "Blood Mend".into(),
                usage: RacialUsage::PerRound,
                max_uses: 1,
                params: params(12.0),
            },
        },
    ]
}

fn templates() -> MessageTemplates {
    let mut map: MessageTemplates = HashMap::new();
    map.insert(
        "damage".into(),
        EventTemplate {
            public: "{attacker} hits {target} for {amount} damage".into(),
            attacker: Some("You hit {target} for {amount} damage".into()),
            target: Some("{attacker} hits you for {amount} damage".into()),
        },
    );
    map.insert(
        "heal".into(),
        EventTemplate {
            public: "{attacker} heals {target} for {amount}".into(),
            attacker: Some("You heal {target} for {amount}".into()),
            target: Some("{attacker} heals you for {amount}".into()),
        },
    );
    map.insert(
        "death".into(),
        EventTemplate {
            public: "{target} has fallen".into(),
            attacker: None,
            target: None,
        },
    );
    map.insert(
        "resurrection".into(),
        EventTemplate {
            public: "{target} clings to unlife and rises again".into(),
            attacker: None,
            target: Some("Your bones refuse to stay down".into()),
        },
    );
    map.insert(
        "corruption".into(),
        EventTemplate {
            public: "Another hero has fallen to the shadows".into(),
            attacker: None,
            target: Some("You feel a dark power take hold of you".into()),
        },
    );
    map.insert(
        "monster_attack".into(),
        EventTemplate {
            public: "The monster lashes out at {target} for {amount} damage".into(),
            attacker: None,
            target: Some("The monster lashes out at you for {amount} damage".into()),
        },
    );
    map.insert(
        "monster_defeated".into(),
        EventTemplate {
            public: "The monster is destroyed!".into(),
            attacker: None,
            target: None,
        },
    );
    map.insert(
        "immunity".into(),
        EventTemplate {
            public: "{target} shrugs off the blow, unharmed".into(),
            attacker: None,
            target: Some("You shrug off the blow, unharmed".into()),
        },
    );
    map.insert(
        "stone_armor_degrade".into(),
        EventTemplate {
            public: "{target}'s stone armor cracks".into(),
            attacker: None,
            target: Some("Your stone armor cracks".into()),
        },
    );
    map.insert(
        "keen_senses_reveal".into(),
        EventTemplate {
            public: "{attacker} studies {target} closely".into(),
            attacker: Some("Something about {target} feels wrong... a warlock!".into()),
            target: None,
        },
    );
    map
}

fn status_defaults() -> StatusEffectDefaults {
    let mut map = StatusEffectDefaults::new();
    map.insert(StatusKind::Poison, StatusEffectDefault { magnitude: 5.0, turns: 3 });
    map.insert(StatusKind::Stunned, StatusEffectDefault { magnitude: 0.0, turns: 1 });
    map.insert(StatusKind::Shielded, StatusEffectDefault { magnitude: 5.0, turns: 2 });
    map.insert(StatusKind::Invisible, StatusEffectDefault { magnitude: 0.0, turns: 1 });
    map.insert(StatusKind::Vulnerable, StatusEffectDefault { magnitude: 0.25, turns: 2 });
    map.insert(StatusKind::Weakened, StatusEffectDefault { magnitude: 0.2, turns: 2 });
    map.insert(StatusKind::Enraged, StatusEffectDefault { magnitude: 0.3, turns: 2 });
    map.insert(StatusKind::Regen, StatusEffectDefault { magnitude: 5.0, turns: 3 });
    map.insert(StatusKind::ImmuneNextDamage, StatusEffectDefault { magnitude: 0.0, turns: 1 });
    map
}

pub fn build_default() -> Catalog {
    Catalog {
        races: races(),
        classes: classes(),
        incompatible_pairs: vec![("kinfolk".to_string(), "assassin".to_string())],
        balance: Balance {
            monster: MonsterBalance {
                base_hp: 100.0,
                base_damage: 10.0,
                hp_per_level: 50.0,
                age_damage_multiplier: 0.05,
                level_up_hp_increment: 20.0,
                level_up_damage_increment: 0.1,
                level_up_armor_increment: 1.0,
                full_heal_on_level_up: true,
            },
            coordination: CoordinationBalance {
                bonus_per_attacker: 0.15,
                max_bonus: 0.5,
            },
            warlock: WarlockBalance {
                conversion: ConversionBalance {
                    base_chance: 0.2,
                    max_chance: 0.5,
                    scaling_factor: 0.3,
                    aoe_modifier: 0.5,
                    random_modifier: 0.0,
                },
                reject_warlock_healing: true,
                win_conditions: WarlockWinConditions {
                    majority_threshold: 2.0,
                },
            },
            armor: ArmorBalance {
                reduction_per_point: 0.05,
                max_reduction: 0.8,
            },
        },
        templates: templates(),
        status_defaults: status_defaults(),
    }
}
