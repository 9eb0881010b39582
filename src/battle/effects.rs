/// Which combatant an effect's side payload lands on. Odd effect ids act
/// on the target, even ids on the user, matching the reference data's
/// numbering convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    User,
    Target,
}

impl Recipient {
    fn from_parity(id: u8) -> Recipient {
        if id & 1 == 1 {
            Recipient::Target
        } else {
            Recipient::User
        }
    }
}

/// Closed union of move-resolution behaviors, one variant per effect id in
/// the move catalog. `from_id` is the single decode point; the engine
/// dispatches on the variant exhaustively, so a new behavior is a new
/// variant plus one match arm, never an edit to existing handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEffect {
    /// 0/1: damage, nothing else
    Plain,
    /// 2/3: damage, then a stage change on the recipient
    HitThenStatChange(Recipient),
    /// 4/5: damage, then a non-volatile status on the recipient
    HitThenStatus(Recipient),
    /// 6/7: flinch or confusion on the recipient, no damage
    InflictVolatile(Recipient),
    /// 8: damage at an elevated critical-hit tier
    RaisedCrit,
    /// 10: 2-5 hits
    MultiHit,
    /// 11: exactly two hits
    DoubleHit,
    /// 13: non-volatile status, narrated failure when blocked
    InflictStatus(Recipient),
    /// 14: forced confusion
    ForceConfuse,
    /// 16/17: stage change only; lowering respects mist
    StatChange(Recipient),
    /// 19: damage, 30% flinch, double power against minimized targets
    StompFlinch,
    /// 20: one-hit knockout with level-based accuracy
    Ohko,
    /// 21: one charge turn, then damage at an elevated crit tier
    ChargeRazorWind,
    /// 22: damage, doubled with invulnerability bypass against airborne
    GustAntiAir,
    /// 23: charge airborne and invulnerable, strike next turn
    ChargeFly,
    /// 24: damage plus a 2-5 turn binding trap
    Binding,
    /// 25: damage, crash recoil on a failed strike
    CrashRisk,
    /// 26: damage, doubled with bypass against underground targets
    AntiDig,
    /// 27: damage with 1/4 recoil
    RecoilQuarter,
    /// 28: 1-2 extra locked-in turns, then self-confusion
    Rampage,
    /// 29: damage with 1/3 recoil
    RecoilThird,
    /// 30: two hits, each with a poison chance
    DoubleHitPoison,
    /// 31: fixed damage from the effect payload
    FixedDamage,
    /// 32: disable the target's last move for 4-7 turns
    Disable,
    /// 33: mist shields the user's side from stage drops
    Mist,
    /// 34: damage, then a recharge turn
    RechargeAfter,
    /// 35: power scales with the target's weight
    WeightScaled,
    /// 36: return double the last physical damage taken
    CounterPhysical,
    /// 37: damage equal to the user's level
    LevelDamage,
    /// 38: damage, user heals half the damage dealt
    DrainHalf,
    /// 39: plant a leech seed on the target
    LeechSeed,
    /// 40: one charge turn absorbing light, then damage
    ChargeSolar,
    /// 41: damage with a 30% paralysis chance
    SecondaryParalyze,
    /// 42: charge underground and invulnerable, strike next turn
    ChargeDig,
    /// 43: lock into this move, disabling the rest of the moveset
    Rage,
    /// 44: copy the target's last move into a temporary slot
    Mimic,
    /// 45: sharply lower the target's Defense
    DoubleDefDrop,
    /// 46: restore half the user's max HP
    HealHalf,
    /// 47: minimize; raises evasion and marks the user squashable
    Minimize,
    /// 48: raise Defense and prime any streak move the user knows
    DefenseCurl,
    /// 49: light screen or reflect on the user's side
    Screen,
    /// 50: eliminate all stage changes on both sides
    Haze,
    /// 51: raise the user's critical-hit stage by two
    FocusEnergy,
    /// 52: store energy for two or three turns, release double the damage
    Bide,
    /// 53: re-dispatch as a random catalog move
    Metronome,
    /// 54: re-dispatch the target's last move
    MirrorMove,
    /// 55: user faints, then full-power damage
    SacrificialBlast,
    /// 56: charge with a Defense boost, strike next turn
    ChargeSkullBash,
    /// 57: drain move that only works on sleeping targets
    DreamEater,
    /// 58: one charge turn glowing, then damage
    ChargeSkyAttack,
    /// 59: copy the target's stats, types, and moves
    Transform,
    /// 60: randomized level-scaled damage
    Psywave,
    /// 61: nothing happens
    Splash,
    /// 62: user faints, damage against halved Defense
    SacrificialBlastPierce,
    /// 63: sleep for two turns, fully healed
    Rest,
    /// 64: become one of the user's own move types
    Conversion,
    /// 65: damage with a chance of burn, freeze, or paralysis
    TriAttack,
    /// 66: halve the target's HP
    HalveHp,
    /// 67: spend a quarter of max HP on a damage-soaking substitute
    Substitute,
    /// 68: last-resort damage with fixed recoil
    Struggle,
    /// 69: permanently copy the target's last move over this one
    Sketch,
    /// 70: up to three hits with rising power
    RampUpTripleHit,
    /// 71: damage, then steal the target's held item
    StealItem,
    /// 72: the target can no longer switch out
    PermaTrap,
    /// 73: take aim; the next move cannot miss the target
    LockOn,
    /// 74: trap a sleeping target in a nightmare
    Nightmare,
    /// 75: thaws the frozen user, 10% burn chance
    ThawStrike,
    /// 76: usable only while asleep, 30% flinch
    SleepTalkStrike,
    /// 77: stat trade-off, or a ghost's HP-fueled curse
    Curse,
    /// 78: power rises as the user's HP falls
    DesperationPower,
    /// 79: become a type resisting the last move taken
    ResistanceShift,
    /// 80: tear PP from the target's last move
    SpitePpDrain,
    /// 81: block single-target moves this turn, halving odds each reuse
    Protect,
    /// 82: halve HP, maximize Attack
    BellyDrum,
    /// 83: scatter spikes on the opposing side
    Spikes,
    /// 84: identify the target, ignoring raised evasion
    Foresight,
    /// 85: power doubles per consecutive successful use, then resets
    Streak,
    /// 86: set weather for five turns
    SetWeather,
    /// 87: block the target's healing for five turns
    HealBlock,
    /// 88: root in place and heal every turn
    Rooting,
}

impl MoveEffect {
    /// Decode a catalog effect id. Unassigned ids return None and are
    /// rejected when the move table loads.
    pub fn from_id(id: u8) -> Option<MoveEffect> {
        use MoveEffect::*;
        match id {
            0 | 1 => Some(Plain),
            2 | 3 => Some(HitThenStatChange(Recipient::from_parity(id))),
            4 | 5 => Some(HitThenStatus(Recipient::from_parity(id))),
            6 | 7 => Some(InflictVolatile(Recipient::from_parity(id))),
            8 => Some(RaisedCrit),
            10 => Some(MultiHit),
            11 => Some(DoubleHit),
            13 => Some(InflictStatus(Recipient::from_parity(id))),
            14 => Some(ForceConfuse),
            16 | 17 => Some(StatChange(Recipient::from_parity(id))),
            19 => Some(StompFlinch),
            20 => Some(Ohko),
            21 => Some(ChargeRazorWind),
            22 => Some(GustAntiAir),
            23 => Some(ChargeFly),
            24 => Some(Binding),
            25 => Some(CrashRisk),
            26 => Some(AntiDig),
            27 => Some(RecoilQuarter),
            28 => Some(Rampage),
            29 => Some(RecoilThird),
            30 => Some(DoubleHitPoison),
            31 => Some(FixedDamage),
            32 => Some(Disable),
            33 => Some(Mist),
            34 => Some(RechargeAfter),
            35 => Some(WeightScaled),
            36 => Some(CounterPhysical),
            37 => Some(LevelDamage),
            38 => Some(DrainHalf),
            39 => Some(LeechSeed),
            40 => Some(ChargeSolar),
            41 => Some(SecondaryParalyze),
            42 => Some(ChargeDig),
            43 => Some(Rage),
            44 => Some(Mimic),
            45 => Some(DoubleDefDrop),
            46 => Some(HealHalf),
            47 => Some(Minimize),
            48 => Some(DefenseCurl),
            49 => Some(Screen),
            50 => Some(Haze),
            51 => Some(FocusEnergy),
            52 => Some(Bide),
            53 => Some(Metronome),
            54 => Some(MirrorMove),
            55 => Some(SacrificialBlast),
            56 => Some(ChargeSkullBash),
            57 => Some(DreamEater),
            58 => Some(ChargeSkyAttack),
            59 => Some(Transform),
            60 => Some(Psywave),
            61 => Some(Splash),
            62 => Some(SacrificialBlastPierce),
            63 => Some(Rest),
            64 => Some(Conversion),
            65 => Some(TriAttack),
            66 => Some(HalveHp),
            67 => Some(Substitute),
            68 => Some(Struggle),
            69 => Some(Sketch),
            70 => Some(RampUpTripleHit),
            71 => Some(StealItem),
            72 => Some(PermaTrap),
            73 => Some(LockOn),
            74 => Some(Nightmare),
            75 => Some(ThawStrike),
            76 => Some(SleepTalkStrike),
            77 => Some(Curse),
            78 => Some(DesperationPower),
            79 => Some(ResistanceShift),
            80 => Some(SpitePpDrain),
            81 => Some(Protect),
            82 => Some(BellyDrum),
            83 => Some(Spikes),
            84 => Some(Foresight),
            85 => Some(Streak),
            86 => Some(SetWeather),
            87 => Some(HealBlock),
            88 => Some(Rooting),
            _ => None,
        }
    }

    /// True for the two-turn moves that queue a forced continuation.
    pub fn is_charge_move(self) -> bool {
        matches!(
            self,
            MoveEffect::ChargeRazorWind
                | MoveEffect::ChargeFly
                | MoveEffect::ChargeDig
                | MoveEffect::ChargeSolar
                | MoveEffect::ChargeSkullBash
                | MoveEffect::ChargeSkyAttack
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parity_selects_recipient() {
        assert_eq!(
            MoveEffect::from_id(2),
            Some(MoveEffect::HitThenStatChange(Recipient::User))
        );
        assert_eq!(
            MoveEffect::from_id(3),
            Some(MoveEffect::HitThenStatChange(Recipient::Target))
        );
        assert_eq!(
            MoveEffect::from_id(13),
            Some(MoveEffect::InflictStatus(Recipient::Target))
        );
    }

    #[rstest]
    #[case(9)]
    #[case(12)]
    #[case(15)]
    #[case(18)]
    #[case(89)]
    #[case(200)]
    fn unassigned_ids_are_rejected(#[case] id: u8) {
        assert_eq!(MoveEffect::from_id(id), None);
    }

    #[test]
    fn charge_moves_are_flagged() {
        assert!(MoveEffect::ChargeFly.is_charge_move());
        assert!(MoveEffect::ChargeSolar.is_charge_move());
        assert!(!MoveEffect::Plain.is_charge_move());
    }
}
