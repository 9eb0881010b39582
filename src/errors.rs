use std::fmt;

/// Errors raised while building simulator entities. Construction is
/// all-or-nothing: a failed constructor leaves nothing behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// The species name or dex id is not in the reference data
    UnknownSpecies(String),
    /// A move name is not in the reference data
    UnknownMove(String),
    /// Moveset is empty
    EmptyMoveset,
    /// Moveset holds more than four moves
    OversizedMoveset(usize),
    /// The same move appears twice in one moveset
    DuplicateMove(String),
    /// Gender string is not male/female/genderless
    InvalidGender(String),
    /// Level outside 1..=100
    InvalidLevel(u8),
    /// An explicit stat line is malformed (wrong shape or zero entry)
    InvalidStats(String),
    /// Current HP above max HP
    InvalidHp { cur: u16, max: u16 },
    /// IV above 31, EV above 255, or EV total above 510
    InvalidEvIv(String),
    UnknownNature(String),
    UnknownItem(String),
    UnknownAbility(String),
    /// Roster outside 1..=6 members
    InvalidRosterSize(usize),
    /// A combatant already belongs to another controller
    AlreadyAssigned(String),
    InvalidTerrain(String),
    InvalidWeather(String),
    /// The bundled or caller-supplied reference data failed to parse
    MalformedData(String),
}

/// Errors raised when a submitted turn action is illegal. Validation runs
/// before any state mutation for the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Action verb not one of move/item/switch
    UnknownAction(String),
    /// Chosen move is not in the active combatant's moveset
    MoveNotKnown(String),
    /// Chosen move has no PP left
    NoPpRemaining(String),
    /// Switching while trapped, rooted, or with no reserve
    CannotSwitch(String),
    UnknownItem(String),
    /// Item target index outside the roster or otherwise unusable
    InvalidItemTarget(usize),
}

/// Errors raised by calls that arrive in the wrong session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// `turn()` before `start()`
    NotStarted,
    /// `start()` on a running battle
    AlreadyStarted,
    /// A controller is already engaged in another battle
    AlreadyInBattle(String),
    /// `turn()` after a winner was declared
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    Construction(ConstructionError),
    Action(ActionError),
    Lifecycle(LifecycleError),
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::UnknownSpecies(name) => {
                write!(f, "invalid species name or id: {}", name)
            }
            ConstructionError::UnknownMove(name) => write!(f, "invalid move: {}", name),
            ConstructionError::EmptyMoveset => write!(f, "moveset must hold at least one move"),
            ConstructionError::OversizedMoveset(n) => {
                write!(f, "moveset holds {} moves, maximum is 4", n)
            }
            ConstructionError::DuplicateMove(name) => {
                write!(f, "duplicate move in moveset: {}", name)
            }
            ConstructionError::InvalidGender(g) => write!(f, "invalid gender: {}", g),
            ConstructionError::InvalidLevel(l) => write!(f, "invalid level: {}", l),
            ConstructionError::InvalidStats(details) => write!(f, "invalid stats: {}", details),
            ConstructionError::InvalidHp { cur, max } => {
                write!(f, "current HP {} exceeds max HP {}", cur, max)
            }
            ConstructionError::InvalidEvIv(details) => write!(f, "invalid EV/IV spread: {}", details),
            ConstructionError::UnknownNature(n) => write!(f, "invalid nature: {}", n),
            ConstructionError::UnknownItem(i) => write!(f, "invalid item: {}", i),
            ConstructionError::UnknownAbility(a) => write!(f, "invalid ability: {}", a),
            ConstructionError::InvalidRosterSize(n) => {
                write!(f, "roster holds {} members, expected 1 to 6", n)
            }
            ConstructionError::AlreadyAssigned(name) => {
                write!(f, "{} already belongs to another trainer", name)
            }
            ConstructionError::InvalidTerrain(t) => write!(f, "invalid terrain type: {}", t),
            ConstructionError::InvalidWeather(w) => write!(f, "invalid weather: {}", w),
            ConstructionError::MalformedData(details) => {
                write!(f, "malformed reference data: {}", details)
            }
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::UnknownAction(verb) => write!(f, "unknown action: {}", verb),
            ActionError::MoveNotKnown(name) => write!(f, "move not in moveset: {}", name),
            ActionError::NoPpRemaining(name) => write!(f, "no PP remaining for {}", name),
            ActionError::CannotSwitch(reason) => write!(f, "cannot switch: {}", reason),
            ActionError::UnknownItem(item) => write!(f, "unknown item: {}", item),
            ActionError::InvalidItemTarget(index) => write!(f, "invalid item target: {}", index),
        }
    }
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::NotStarted => write!(f, "battle has not been started"),
            LifecycleError::AlreadyStarted => write!(f, "battle already started"),
            LifecycleError::AlreadyInBattle(name) => {
                write!(f, "{} is already engaged in a battle", name)
            }
            LifecycleError::Finished => write!(f, "battle already has a winner"),
        }
    }
}

impl fmt::Display for BattleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleError::Construction(err) => write!(f, "construction error: {}", err),
            BattleError::Action(err) => write!(f, "illegal action: {}", err),
            BattleError::Lifecycle(err) => write!(f, "lifecycle error: {}", err),
        }
    }
}

impl std::error::Error for ConstructionError {}
impl std::error::Error for ActionError {}
impl std::error::Error for LifecycleError {}
impl std::error::Error for BattleError {}

impl From<ConstructionError> for BattleError {
    fn from(err: ConstructionError) -> Self {
        BattleError::Construction(err)
    }
}

impl From<ActionError> for BattleError {
    fn from(err: ActionError) -> Self {
        BattleError::Action(err)
    }
}

impl From<LifecycleError> for BattleError {
    fn from(err: LifecycleError) -> Self {
        BattleError::Lifecycle(err)
    }
}

/// Result alias used across the crate.
pub type BattleResult<T> = Result<T, BattleError>;
