use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use recipe_book_adapters::{
    present_session, present_stars, TerminalHost, ThreadTimerScheduler, TICK_INTERVAL,
};
use recipe_book_application::{
    ApplicationError, ApplicationService, OpenSessionCommand, RateRecipeCommand,
    SessionController, TickReport, TimerToken, ToggleFavoriteCommand,
};
use recipe_book_domain::{format_clock, Rating, RecipeId, StepId, TimerState};
use tracing::{debug, info};

const HELP: &str = "\
команды:
  + / -            больше или меньше порций
  servings <n>     задать число порций
  done <шаг>       отметить шаг
  timer <шаг> [мин] запустить таймер шага
  stop             остановить таймер
  show             показать карточку
  share | print    поделиться | распечатать
  fav              в избранное / из избранного
  rate <1-5>       оценить рецепт
  help | quit";

/// Everything the cook loop reacts to arrives on one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookEvent {
    Input(String),
    InputClosed,
    Tick(TimerToken),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookInput {
    More,
    Less,
    Servings(u32),
    Toggle(StepId),
    Timer(StepId),
    TimerFor { step_id: StepId, minutes: u32 },
    Stop,
    Show,
    Share,
    Print,
    Favorite,
    Rate(i64),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Say(String),
    Silent,
    Quit,
}

/// Blank lines parse to `None`.
pub fn parse_input(line: &str) -> Result<Option<CookInput>, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let input = match (command, args.as_slice()) {
        ("+", []) => CookInput::More,
        ("-", []) => CookInput::Less,
        ("servings", [n]) => CookInput::Servings(parse_number(n, "servings")?),
        ("done", [step]) => CookInput::Toggle(StepId(parse_number(step, "step")?)),
        ("timer", [step]) => CookInput::Timer(StepId(parse_number(step, "step")?)),
        ("timer", [step, minutes]) => CookInput::TimerFor {
            step_id: StepId(parse_number(step, "step")?),
            minutes: parse_number(minutes, "minutes")?,
        },
        ("stop", []) => CookInput::Stop,
        ("show", []) => CookInput::Show,
        ("share", []) => CookInput::Share,
        ("print", []) => CookInput::Print,
        ("fav", []) => CookInput::Favorite,
        ("rate", [stars]) => CookInput::Rate(
            stars
                .parse::<i64>()
                .map_err(|_| format!("invalid rating: {stars}"))?,
        ),
        ("help" | "?", []) => CookInput::Help,
        ("quit" | "q", []) => CookInput::Quit,
        (other, _) => return Err(format!("unknown command: {other} (try help)")),
    };
    Ok(Some(input))
}

fn parse_number(raw: &str, what: &str) -> Result<u32, String> {
    raw.parse::<u32>()
        .map_err(|_| format!("invalid {what}: {raw}"))
}

pub fn apply(
    input: CookInput,
    controller: &mut SessionController,
    service: &mut ApplicationService,
) -> Result<Reply, ApplicationError> {
    let reply = match input {
        CookInput::More => {
            controller.increment_servings();
            Reply::Say(servings_line(controller))
        }
        CookInput::Less => {
            controller.decrement_servings();
            Reply::Say(servings_line(controller))
        }
        CookInput::Servings(servings) => {
            controller.set_servings(servings);
            Reply::Say(servings_line(controller))
        }
        CookInput::Toggle(step_id) => {
            let done = controller.toggle_step(step_id)?;
            let mark = if done { "готово" } else { "не готово" };
            Reply::Say(format!(
                "шаг {step_id}: {mark}, прогресс {}%",
                controller.session().rounded_progress()
            ))
        }
        CookInput::Timer(step_id) => {
            controller.start_step_timer(step_id)?;
            Reply::Say(timer_line(controller))
        }
        CookInput::TimerFor { step_id, minutes } => {
            controller.start_timer(step_id, minutes)?;
            Reply::Say(timer_line(controller))
        }
        CookInput::Stop => {
            controller.stop_timer();
            Reply::Say("таймер остановлен".to_string())
        }
        CookInput::Show => Reply::Say(present_session(controller.session()).trim_end().to_string()),
        CookInput::Share => {
            controller.share();
            Reply::Silent
        }
        CookInput::Print => {
            controller.print();
            Reply::Silent
        }
        CookInput::Favorite => {
            let recipe_id = session_recipe(controller);
            let favorite = service.toggle_favorite(ToggleFavoriteCommand { recipe_id })?;
            Reply::Say(if favorite {
                "♥ добавлено в избранное".to_string()
            } else {
                "убрано из избранного".to_string()
            })
        }
        CookInput::Rate(stars) => {
            let rating = Rating::new(stars)?;
            let recipe_id = session_recipe(controller);
            service.rate_recipe(RateRecipeCommand { recipe_id, rating })?;
            Reply::Say(format!("ваша оценка: {}", present_stars(Some(rating))))
        }
        CookInput::Help => Reply::Say(HELP.to_string()),
        CookInput::Quit => Reply::Quit,
    };
    Ok(reply)
}

fn session_recipe(controller: &SessionController) -> RecipeId {
    controller.session().recipe().id
}

fn servings_line(controller: &SessionController) -> String {
    let session = controller.session();
    format!(
        "Порции: {} ({})",
        session.servings(),
        session.multiplier_label()
    )
}

fn timer_line(controller: &SessionController) -> String {
    match controller.session().timer() {
        TimerState::Running {
            step_id,
            remaining_seconds,
        } => format!("⏱ шаг {step_id}: {}", format_clock(remaining_seconds)),
        TimerState::Idle => "таймер не запущен".to_string(),
    }
}

/// Countdown lines are printed once a minute and through the last ten seconds.
fn tick_line(report: TickReport) -> Option<String> {
    match report {
        TickReport::Running {
            step_id,
            remaining_seconds,
        } if remaining_seconds % 60 == 0 || remaining_seconds <= 10 => Some(format!(
            "⏱ шаг {step_id}: {}",
            format_clock(remaining_seconds)
        )),
        _ => None,
    }
}

fn spawn_stdin_reader(events: Sender<CookEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if events.send(CookEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = events.send(CookEvent::InputClosed);
    });
}

/// Runs an interactive cooking session until `quit` or end of input.
pub fn run_cook(
    service: &mut ApplicationService,
    recipe_id: RecipeId,
    servings: Option<u32>,
    tick_interval: Duration,
) -> Result<(), ApplicationError> {
    let (events, inbox) = mpsc::channel();
    let scheduler = if tick_interval == TICK_INTERVAL {
        ThreadTimerScheduler::new(events.clone(), CookEvent::Tick)
    } else {
        ThreadTimerScheduler::with_period(events.clone(), CookEvent::Tick, tick_interval)
    };
    let mut controller = service.open_session(
        OpenSessionCommand {
            recipe_id,
            servings,
        },
        Box::new(scheduler),
        Box::new(TerminalHost::stdout()),
    )?;
    info!(recipe = %recipe_id, "cooking session opened");

    println!("{}", present_session(controller.session()).trim_end());
    println!("{HELP}");
    spawn_stdin_reader(events);

    while let Ok(event) = inbox.recv() {
        match event {
            CookEvent::Tick(token) => {
                if let Some(line) = tick_line(controller.on_tick(token)) {
                    println!("{line}");
                }
            }
            CookEvent::InputClosed => break,
            CookEvent::Input(line) => match parse_input(&line) {
                Ok(None) => {}
                Ok(Some(input)) => match apply(input, &mut controller, service) {
                    Ok(Reply::Say(text)) => println!("{text}"),
                    Ok(Reply::Silent) => {}
                    Ok(Reply::Quit) => break,
                    Err(error) => {
                        debug!(%error, "cook command failed");
                        println!("ошибка: {error}");
                    }
                },
                Err(message) => println!("{message}"),
            },
        }
        let _ = io::stdout().flush();
    }

    controller.close();
    info!(recipe = %recipe_id, "cooking session closed");
    Ok(())
}
