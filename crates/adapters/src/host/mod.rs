use std::cell::RefCell;
use std::io::{self, Stdout, Write};

use recipe_book_application::{ApplicationError, HostActions, ShareRequest};
use recipe_book_domain::{RecipeSession, StepId};

use crate::presenters::present_session;

/// Host actions for a terminal: a bell for finished timers, plain text
/// for sharing and printing.
pub struct TerminalHost<W: Write> {
    out: RefCell<W>,
}

impl TerminalHost<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalHost<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn emit(&self, text: &str) -> Result<(), ApplicationError> {
        let mut out = self.out.borrow_mut();
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|error| ApplicationError::Io(error.to_string()))
    }
}

impl<W: Write> HostActions for TerminalHost<W> {
    fn notify_timer_done(&self, step_id: StepId) -> Result<(), ApplicationError> {
        self.emit(&format!("\x07Таймер шага {step_id} завершён!\n"))
    }

    fn share(&self, request: &ShareRequest) -> Result<(), ApplicationError> {
        self.emit(&format!("{}\n{}\n", request.title, request.text))
    }

    fn print(&self, session: &RecipeSession) -> Result<(), ApplicationError> {
        self.emit(&present_session(session))
    }
}
