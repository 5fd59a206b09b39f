//! Collaborator contracts consumed by the core.
//!
//! These traits describe what the core expects from the outside world
//! (logging, id generation, tokens, persistence). Implementations live in
//! other crates or in the host application.

mod id;
mod logger;
mod token;
mod users;

pub use id::{IdGenerator, UuidIdGenerator};
pub use logger::{
    ControllerLogger, ControllerTimingEntry, EntryContext, LogErrorEntry, LogInfoEntry,
    LoggerProvider, SendLogError, SendLogInfo, SendLogTimeController, SendLogTimeUseCase,
    UseCaseLogger, UseCaseTimingEntry,
};
pub use token::{
    GenerateJwtParameters, GenerateJwtTokenProvider, JwtToken, VerifiedSubject,
    VerifyJwtParameters, VerifyJwtTokenProvider,
};
pub use users::{FoundUser, ValidateEmailParameters, ValidateEmailResult, ValidateEmailUsersRepository};
