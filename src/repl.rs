//! The read-interpret-respond loop.

use std::io::{self, BufRead, Write};

use calbot_core::{AppConfig, CalbotError, CalendarGateway};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::commands;
use crate::console::Console;
use crate::interpreter::{DateTimeParser, Intent, Interpreter, normalize};
use crate::render::{failure, hint};

pub const PROMPT: &str = "You: ";

const GREETING: &[&str] = &[
    "Hello! I'm your Calendar Chatbot.",
    "You can ask:",
    "  What's on my calendar today?",
    "  What's on my calendar tomorrow?",
    "  What's on my calendar for next month?",
    "  Add a meeting with John tomorrow at 3 PM",
    "  Add a doctor appointment on 2025-08-10 at 3 PM",
    "  Delete event",
    "  Delete all",
    "  Exit",
];

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Repl<'a, G, P, R, W> {
    gateway: &'a G,
    config: &'a AppConfig,
    interpreter: Interpreter<P>,
    console: Console<R, W>,
}

impl<'a, G, P, R, W> Repl<'a, G, P, R, W>
where
    G: CalendarGateway,
    P: DateTimeParser,
    R: BufRead,
    W: Write,
{
    pub fn new(
        gateway: &'a G,
        config: &'a AppConfig,
        interpreter: Interpreter<P>,
        console: Console<R, W>,
    ) -> Self {
        Repl {
            gateway,
            config,
            interpreter,
            console,
        }
    }

    /// Run until "exit" or end of input. Only terminal I/O errors end it early.
    pub async fn run(&mut self) -> io::Result<()> {
        for line in GREETING {
            self.console.say(line)?;
        }

        loop {
            self.console.say("")?;
            let Some(line) = self.console.prompt(PROMPT)? else {
                debug!("End of input");
                return Ok(());
            };

            if self.handle(&line, Utc::now()).await? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Interpret one raw input line and carry it out.
    pub async fn handle(&mut self, line: &str, now: DateTime<Utc>) -> io::Result<Flow> {
        let command = normalize(line);
        let local_now = now.with_timezone(&self.config.timezone).naive_local();

        let intent = match self.interpreter.interpret(&command, local_now) {
            Ok(intent) => intent,
            Err(CalbotError::UnrecognizedCommand(_)) => {
                self.console.say("I didn't understand that. Try again.")?;
                return Ok(Flow::Continue);
            }
            Err(e) => {
                self.console.say(failure(&e.to_string()))?;
                return Ok(Flow::Continue);
            }
        };

        debug!(?intent, "Interpreted command");

        let (gateway, config, console) = (self.gateway, self.config, &mut self.console);

        match intent {
            Intent::Query(window) => commands::query::run(gateway, config, console, window).await?,
            Intent::AddMeeting(request) | Intent::AddEvent(request) => {
                commands::add::run(gateway, config, console, request).await?
            }
            Intent::DeleteOne => commands::delete::one(gateway, config, console, now).await?,
            Intent::DeleteAll => commands::delete::all(gateway, config, console, now).await?,
            Intent::Usage(example) => console.say(hint(example))?,
            Intent::Exit => {
                console.say("Goodbye!")?;
                return Ok(Flow::Exit);
            }
        }

        Ok(Flow::Continue)
    }
}

#[cfg(test)]
impl<G, P, R: BufRead> Repl<'_, G, P, R, Vec<u8>> {
    fn output(&self) -> String {
        String::from_utf8_lossy(self.console.output()).into_owned()
    }
}
