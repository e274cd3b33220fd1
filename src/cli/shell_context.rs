use std::sync::Arc;

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;

use crate::cli::commands;
use crate::cli::errors::{CliError, CommandError};
use crate::cli::formatting::format_amount;
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::CommandRegistry;
use crate::config::{Config, ConfigManager};
use crate::core::utils::{app_data_dir, store_dir_in};
use crate::core::Session;
use crate::storage::{JsonFileStore, KeyValueStore};

pub type CommandResult = Result<LoopControl, CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// State shared by every command of one shell run.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) running: bool,
    pub(crate) last_command: Option<String>,
    registry: CommandRegistry,
    config_manager: ConfigManager,
    config: Config,
    store: Arc<dyn KeyValueStore>,
    session: Option<Session>,
    theme: ColorfulTheme,
}

impl ShellContext {
    /// Opens the config and the file store under the application data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = app_data_dir();
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "falling back to default configuration");
                output::warning(format!("{err}. Using default settings."));
                Config::default()
            }
        };
        let store: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileStore::new(Some(store_dir_in(&base)))?);
        Ok(Self::with_parts(mode, config_manager, config, store))
    }

    pub fn with_parts(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        output::set_preferences(OutputPreferences {
            plain: mode == CliMode::Script,
        });
        Self {
            mode,
            running: true,
            last_command: None,
            registry: CommandRegistry::new(commands::all_definitions()),
            config_manager,
            config,
            store,
            session: None,
            theme: ColorfulTheme::default(),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        match &self.session {
            Some(session) => format!("ledger[{}]> ", session.user()),
            None => "ledger> ".into(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Applies a single setting and writes the config file.
    pub(crate) fn update_config(&mut self, key: &str, value: &str) -> Result<(), CommandError> {
        let mut updated = self.config.clone();
        updated.set_value(key, value)?;
        self.config_manager.save(&updated)?;
        self.config = updated;
        Ok(())
    }

    pub(crate) fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub(crate) fn session(&self) -> Result<&Session, CommandError> {
        self.session.as_ref().ok_or(CommandError::NotLoggedIn)
    }

    /// Hydrates the ledger for `user` and starts printing balances after each change.
    pub(crate) fn start_session(&mut self, user: &str) -> Result<&Session, CommandError> {
        if let Some(active) = &self.session {
            return Err(CommandError::InvalidArguments(format!(
                "`{}` is already logged in. Use `logout` first.",
                active.user()
            )));
        }
        let session = Session::login(user, Arc::clone(&self.store), &self.config)?;
        let symbol = self.config.currency_symbol.clone();
        session.with_engine(|engine| {
            engine.subscribe(move |aggregates| {
                output::info(format!(
                    "Balances  bank {}  cash {}",
                    format_amount(&symbol, aggregates.balance.bank),
                    format_amount(&symbol, aggregates.balance.cash)
                ));
            })
        })?;
        let session = self.session.insert(session);
        Ok(&*session)
    }

    /// Ends the active session and removes its persisted ledger.
    pub(crate) fn end_session(&mut self) -> Result<String, CommandError> {
        let session = self.session.take().ok_or(CommandError::NotLoggedIn)?;
        let user = session.user().to_string();
        session.logout()?;
        Ok(user)
    }

    /// Retries any store write still owed by the active session.
    pub(crate) fn shutdown(&mut self) {
        if let Some(session) = &self.session {
            match session.with_engine(|engine| engine.flush()) {
                Ok(Ok(())) => {}
                Ok(Err(err)) | Err(err) => {
                    tracing::warn!(error = %err, "unsaved ledger changes at exit");
                    cli_io::print_warning(format!("Unsaved changes could not be written: {err}"));
                }
            }
        }
    }

    pub(crate) fn dispatch(&mut self, command: &str, raw: &str, args: &[&str]) -> CommandResult {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.closest_command(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    fn closest_command(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= 3)
            .map(|(_, name)| name)
    }

    /// Asks before destructive commands. Script runs never block on input.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_info("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::NotLoggedIn => {
                cli_io::print_error(CommandError::NotLoggedIn);
                Ok(())
            }
            CommandError::Ledger(err) if err.is_user_error() => {
                cli_io::print_error(err);
                Ok(())
            }
            other => {
                tracing::error!(error = %other, command = ?self.last_command, "command failed");
                cli_io::print_error(other);
                Ok(())
            }
        }
    }
}
