pub mod commands;
pub mod utils;

use djangogen::manage::Toolchain;
use djangogen::prompt::Prompter;
use djangogen::ProjectContext;

/// Everything a command handler needs besides its own arguments
pub struct Session {
    pub ctx: ProjectContext,
    pub prompter: Box<dyn Prompter>,
}

impl Session {
    pub fn new(ctx: ProjectContext, prompter: Box<dyn Prompter>) -> Self {
        Self { ctx, prompter }
    }

    pub fn toolchain(&self) -> Toolchain {
        Toolchain::new(&self.ctx)
    }
}
