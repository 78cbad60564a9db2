use crate::ui::{components, setting_card};
use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Element, Fill, Task};
use pole_to_win::{
    restart_as_admin, restart_explorer, restart_windows, ApplyReport, AppConfig, BackupSnapshot,
    Choice, ProcessElevation, SettingCatalog, SettingView, SettingsController,
};

#[cfg(windows)]
type Registry = pole_to_win::WinRegistry;
#[cfg(not(windows))]
type Registry = pole_to_win::MemoryRegistry;

#[derive(Debug, Clone)]
pub enum Message {
    Toggled(String, Choice),
    ApplySelected,
    ApplyAll,
    Restore,
    RestartExplorer,
    RestartWindows,
    Confirmed,
    Cancelled,
    SystemActionDone(Result<String, String>),
    RestartAsAdmin,
}

/// Actions that wait for a yes/no answer.
enum Confirm {
    Restore(BackupSnapshot),
    RestartExplorer,
    RestartWindows,
}

impl Confirm {
    fn question(&self) -> String {
        match self {
            Self::Restore(snapshot) => format!(
                "Restore settings from the backup taken at {}?",
                snapshot.timestamp
            ),
            Self::RestartExplorer => "Restart explorer.exe?".to_string(),
            Self::RestartWindows => {
                "Restart Windows now? Unsaved work in other programs will be lost.".to_string()
            }
        }
    }
}

pub struct State {
    controller: SettingsController<Registry, ProcessElevation>,
    views: Vec<SettingView>,
    is_admin: bool,
    status_message: String,
    confirm: Option<Confirm>,
}

pub fn init(config: AppConfig, catalog: SettingCatalog) -> (State, Task<Message>) {
    let mut controller = SettingsController::new(
        catalog,
        Registry::default(),
        ProcessElevation,
        config.backup_store(),
    )
    .with_unknown_display(config.unknown_display);
    controller.scan_all();

    let is_admin = controller.is_elevated();
    let views = controller.views();
    (
        State {
            controller,
            views,
            is_admin,
            status_message: String::new(),
            confirm: None,
        },
        Task::none(),
    )
}

fn report_message(verb: &str, report: &ApplyReport) -> String {
    let mut msg = format!("{verb} {} setting(s).", report.applied);
    if !report.failed.is_empty() {
        msg.push_str(&format!(" Failed: {}.", report.failed.join(", ")));
    }
    msg
}

async fn run_blocking(
    action: fn() -> pole_to_win::Result<()>,
    done: &'static str,
) -> Result<String, String> {
    tokio::task::spawn_blocking(action)
        .await
        .map_err(|e| e.to_string())?
        .map(|()| done.to_string())
        .map_err(|e| e.to_string())
}

pub fn update(state: &mut State, message: Message) -> Task<Message> {
    let task = handle(state, message);
    state.views = state.controller.views();
    task
}

fn handle(state: &mut State, message: Message) -> Task<Message> {
    match message {
        Message::Toggled(id, choice) => {
            if let Err(e) = state.controller.select(&id, choice) {
                state.status_message = e.to_string();
            }
            Task::none()
        }
        Message::ApplySelected => {
            state.status_message = match state.controller.apply_selected() {
                Ok(report) => format!(
                    "{} Some settings take effect after a restart.",
                    report_message("Applied", &report)
                ),
                Err(e) => e.to_string(),
            };
            Task::none()
        }
        Message::ApplyAll => {
            state.status_message = match state.controller.apply_all() {
                Ok(report) => format!(
                    "{} Some settings take effect after a restart.",
                    report_message("Applied", &report)
                ),
                Err(e) => e.to_string(),
            };
            Task::none()
        }
        Message::Restore => {
            match state.controller.prepare_restore() {
                Ok(snapshot) => state.confirm = Some(Confirm::Restore(snapshot)),
                Err(e) => state.status_message = e.to_string(),
            }
            Task::none()
        }
        Message::RestartExplorer => {
            state.confirm = Some(Confirm::RestartExplorer);
            Task::none()
        }
        Message::RestartWindows => {
            state.confirm = Some(Confirm::RestartWindows);
            Task::none()
        }
        Message::Cancelled => {
            state.confirm = None;
            Task::none()
        }
        Message::Confirmed => match state.confirm.take() {
            Some(Confirm::Restore(snapshot)) => {
                state.status_message = match state.controller.restore(&snapshot) {
                    Ok(report) => report_message("Restored", &report),
                    Err(e) => e.to_string(),
                };
                Task::none()
            }
            Some(Confirm::RestartExplorer) => Task::perform(
                run_blocking(restart_explorer, "explorer.exe restarted."),
                Message::SystemActionDone,
            ),
            Some(Confirm::RestartWindows) => Task::perform(
                run_blocking(restart_windows, "Restarting Windows..."),
                Message::SystemActionDone,
            ),
            None => Task::none(),
        },
        Message::SystemActionDone(result) => {
            state.status_message = match result {
                Ok(msg) => msg,
                Err(e) => format!("Restart failed: {e}"),
            };
            Task::none()
        }
        Message::RestartAsAdmin => {
            if let Err(e) = restart_as_admin() {
                state.status_message = e.to_string();
            }
            Task::none()
        }
    }
}

pub fn view(state: &State) -> Element<'_, Message> {
    let mut content = column![view_header()].spacing(10).padding(15);

    if !state.is_admin {
        content = content.push(components::admin_warning(Message::RestartAsAdmin));
    }

    let dirty = state.controller.dirty_count();
    if dirty > 0 {
        content = content.push(components::pending_notice(dirty));
    }

    if !state.status_message.is_empty() {
        content = content.push(components::status_banner(&state.status_message));
    }

    if let Some(confirm) = &state.confirm {
        content = content.push(components::confirm_bar(
            confirm.question(),
            Message::Confirmed,
            Message::Cancelled,
        ));
    }

    let cards = state
        .views
        .iter()
        .fold(column![].spacing(8), |col, setting| {
            col.push(setting_card::view(setting, Message::Toggled))
        });

    content = content
        .push(scrollable(cards).height(Fill))
        .push(view_actions())
        .push(view_system_actions());

    container(content).width(Fill).height(Fill).into()
}

fn view_header() -> Element<'static, Message> {
    text("Pole To Win No11").size(26).into()
}

fn view_actions() -> Element<'static, Message> {
    row![
        button("Apply selected")
            .on_press(Message::ApplySelected)
            .padding(10)
            .width(Fill),
        button("Apply all")
            .on_press(Message::ApplyAll)
            .padding(10)
            .width(Fill),
        button("Restore backup")
            .on_press(Message::Restore)
            .padding(10)
            .width(Fill),
    ]
    .spacing(10)
    .into()
}

fn view_system_actions() -> Element<'static, Message> {
    row![
        button("Restart Explorer")
            .on_press(Message::RestartExplorer)
            .padding(8)
            .width(Fill),
        button("Restart Windows")
            .on_press(Message::RestartWindows)
            .padding(8)
            .width(Fill),
    ]
    .spacing(10)
    .into()
}

