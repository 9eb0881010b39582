use schema::{NvStatusKind, PokemonType, Stat};

use crate::battle::engine::BattleCtx;
use crate::dex::AbilityCap;
use crate::pokemon::NvStatus;

impl BattleCtx<'_> {
    pub(crate) fn failed(&mut self) {
        self.log.push("But, it failed!".to_string());
    }

    pub(crate) fn missed(&mut self, atk: usize) {
        let nickname = self.active(atk).nickname.clone();
        self.log.push(format!("{}'s attack missed!", nickname));
    }

    /// Apply a non-volatile status by catalog code. `forced` marks a
    /// status move, which narrates its failures; secondary infliction
    /// stays silent when blocked.
    pub(crate) fn give_nv_status(&mut self, code: i16, side: usize, forced: bool) {
        match NvStatusKind::from_code(code) {
            Some(NvStatusKind::Burned) => self.inflict_nv(
                side,
                forced,
                NvStatusKind::Burned,
                Some(PokemonType::Fire),
                "was burned!",
                "is already burned!",
            ),
            Some(NvStatusKind::Frozen) => self.inflict_nv(
                side,
                forced,
                NvStatusKind::Frozen,
                Some(PokemonType::Ice),
                "was frozen solid!",
                "is already frozen!",
            ),
            Some(NvStatusKind::Paralyzed) => self.inflict_nv(
                side,
                forced,
                NvStatusKind::Paralyzed,
                None,
                "is paralyzed! It may be unable to move!",
                "is already paralyzed!",
            ),
            Some(NvStatusKind::Poisoned) => self.inflict_nv(
                side,
                forced,
                NvStatusKind::Poisoned,
                None,
                "was poisoned!",
                "is already poisoned!",
            ),
            Some(NvStatusKind::Asleep) => self.inflict_nv(
                side,
                forced,
                NvStatusKind::Asleep,
                None,
                "fell asleep!",
                "is already asleep!",
            ),
            Some(NvStatusKind::BadlyPoisoned) => self.inflict_nv(
                side,
                forced,
                NvStatusKind::BadlyPoisoned,
                None,
                "was badly poisoned!",
                "is already badly poisoned!",
            ),
            None => {}
        }
    }

    fn inflict_nv(
        &mut self,
        side: usize,
        forced: bool,
        kind: NvStatusKind,
        immune_type: Option<PokemonType>,
        applied_text: &str,
        already_text: &str,
    ) {
        let (nickname, blocked, immune, shielded, existing) = {
            let p = self.active(side);
            (
                p.nickname.clone(),
                p.v.substitute > 0,
                immune_type.map_or(false, |t| p.has_type(t)),
                // Secondary infliction bounces off a shielded holder.
                !forced
                    && self
                        .dex
                        .ability_has(p.ability.as_deref(), AbilityCap::BlocksSecondary),
                p.nv_status,
            )
        };
        if blocked || immune || shielded {
            if forced {
                self.failed();
            }
            return;
        }
        match existing {
            Some(status) if forced && status.kind == kind => {
                self.log.push(format!("{} {}", nickname, already_text));
            }
            Some(_) => {}
            None => {
                let counter = match kind {
                    NvStatusKind::Asleep => self.rng.sleep_turns(),
                    NvStatusKind::BadlyPoisoned => 1,
                    _ => 0,
                };
                self.active_mut(side).nv_status = Some(NvStatus { kind, counter });
                self.log.push(format!("{} {}", nickname, applied_text));
            }
        }
    }

    /// Put the recipient to sleep for a fixed count (rest).
    pub(crate) fn force_sleep(&mut self, side: usize, turns: u8) {
        self.active_mut(side).nv_status = Some(NvStatus {
            kind: NvStatusKind::Asleep,
            counter: turns,
        });
    }

    pub(crate) fn confuse(&mut self, side: usize, forced: bool) {
        let (nickname, blocked, already) = {
            let p = self.active(side);
            (p.nickname.clone(), p.v.substitute > 0, p.v.confused > 0)
        };
        if blocked {
            if forced {
                self.failed();
            }
            return;
        }
        if forced && already {
            self.log.push(format!("{} is already confused!", nickname));
            return;
        }
        let turns = self.rng.confusion_turns();
        self.active_mut(side).v.confused = turns;
        self.log.push(format!("{} became confused!", nickname));
    }

    /// Flinching only matters for a combatant that has not acted yet.
    pub(crate) fn flinch(&mut self, side: usize, is_first: bool) {
        if self
            .dex
            .ability_has(self.active(side).ability.as_deref(), AbilityCap::BlocksSecondary)
        {
            return;
        }
        let p = self.active_mut(side);
        if p.v.substitute > 0 {
            return;
        }
        if is_first && p.is_alive() && !p.v.flinched {
            p.v.flinched = true;
        }
    }

    /// Shift one stage on the recipient, with bounds narration. `forced`
    /// narrates failures against fainted or substitute-shielded targets.
    pub(crate) fn give_stat_change(&mut self, side: usize, stat_code: i16, amount: i8, forced: bool) {
        let Some(stat) = Stat::from_index(stat_code as usize) else {
            return;
        };
        let (nickname, alive, substitute) = {
            let p = self.active(side);
            (p.nickname.clone(), p.is_alive(), p.v.substitute > 0)
        };
        if !alive {
            if forced {
                self.failed();
            }
            return;
        }
        if substitute && amount < 0 {
            if forced {
                self.failed();
            }
            return;
        }
        if amount == 0 {
            return;
        }
        let current = self.active(side).stage(stat);
        let text = Self::stage_text(&nickname, stat, current, amount);
        self.log.push(text);
        self.active_mut(side).apply_stage(stat, amount);
    }

    fn stage_text(nickname: &str, stat: Stat, current: i8, amount: i8) -> String {
        let base = format!("{}'s {}", nickname, stat.display_name());
        let suffix = if amount > 0 {
            if current >= 6 {
                " won't go any higher!"
            } else if amount == 1 {
                " rose!"
            } else if amount == 2 {
                " rose sharply!"
            } else {
                " rose drastically!"
            }
        } else if current <= -6 {
            " won't go any lower!"
        } else if amount == -1 {
            " fell!"
        } else if amount == -2 {
            " fell harshly!"
        } else {
            " fell severely!"
        };
        base + suffix
    }
}
