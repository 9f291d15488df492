// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    collections::HashMap,
    fmt::Debug,
    io::{self, BufRead, Write},
    sync::{Mutex, MutexGuard},
    time::SystemTime,
};

use derive_more::From;
use serde::{Deserialize, Serialize};
use tracing::{
    field::{Field, Visit},
    span::Attributes,
    Event, Id, Subscriber,
};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

use crate::tracing::constants;

#[derive(Debug, Serialize, Deserialize)]
pub struct GameEvent {
    pub timestamp: SystemTime,
    pub kind: GameEventKind,
}

#[derive(Debug, Serialize, Deserialize, From)]
pub enum GameEventKind {
    Start(StartEvent),
    Instant(InstantEvent),
    End(EndEvent),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartEvent {
    pub id: u64,
    pub kind: StartEventKind,
}

#[derive(Debug, Serialize, Deserialize, From)]
pub enum StartEventKind {
    LegalityPass(LegalityPassStartEvent),
    Evaluate(EvaluateStartEvent),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LegalityPassStartEvent {
    pub to_move: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluateStartEvent {}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstantEvent {
    pub kind: InstantEventKind,
}

#[derive(Debug, Serialize, Deserialize, From)]
pub enum InstantEventKind {
    Check(CheckEvent),
    Pin(PinEvent),
    MoveApplied(MoveAppliedEvent),
    AspectTerm(AspectTermEvent),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckEvent {
    pub king: String,
    pub attacker: String,
    pub piece: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PinEvent {
    pub pinned: String,
    pub pinner: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveAppliedEvent {
    pub mov: String,
    pub side: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AspectTermEvent {
    pub side: String,
    pub aspect: String,
    pub value: i64,
    pub weighted: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndEvent {
    pub id: u64,
    pub kind: EndEventKind,
}

#[derive(Debug, Serialize, Deserialize, From)]
pub enum EndEventKind {
    LegalityPass(LegalityPassEndEvent),
    Evaluate(EvaluateEndEvent),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LegalityPassEndEvent {}

#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluateEndEvent {}

/// The GameRecordLayer is a Layer that understands the instrumentation in warden's legality pass and evaluator. It
/// writes every pass, check, pin, move and aspect term to its destination as one JSON document per line, so that a
/// game can be replayed and inspected after the fact.
pub struct GameRecordLayer {
    writer: Box<Mutex<dyn Write + Send + Sync>>,
}

impl GameRecordLayer {
    pub fn new<W: Write + 'static + Send + Sync>(dest: W) -> GameRecordLayer {
        GameRecordLayer {
            writer: Box::new(Mutex::new(dest)),
        }
    }

    fn writer(&self) -> MutexGuard<'_, dyn Write + Send + Sync + 'static> {
        match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn record_event<T: Into<GameEventKind>>(&self, kind: T) {
        let event = GameEvent {
            timestamp: SystemTime::now(),
            kind: kind.into(),
        };

        let mut writer = self.writer();
        let written = serde_json::to_writer(&mut *writer, &event)
            .map_err(io::Error::from)
            .and_then(|_| writeln!(&mut *writer));
        if let Err(err) = written {
            eprintln!("failed to write game record event: {}", err);
        }
    }

    fn record_start_event<T: Into<StartEventKind>>(&self, id: &Id, kind: T) {
        let event = StartEvent {
            id: id.into_u64(),
            kind: kind.into(),
        };

        self.record_event(event);
    }

    fn record_instant_event<T: Into<InstantEventKind>>(&self, kind: T) {
        let event = InstantEvent { kind: kind.into() };
        self.record_event(event);
    }

    fn record_end_event<T: Into<EndEventKind>>(&self, id: &Id, kind: T) {
        let event = EndEvent {
            id: id.into_u64(),
            kind: kind.into(),
        };

        self.record_event(event);
    }

    fn on_evaluate_exit(&self, id: &Id) {
        self.record_end_event(id, EvaluateEndEvent {});
        if let Err(err) = self.writer().flush() {
            eprintln!("failed to flush game record: {}", err);
        }
    }

    fn on_check(&self, fields: &HashMap<String, String>) {
        self.record_instant_event(CheckEvent {
            king: field(fields, "king"),
            attacker: field(fields, "attacker"),
            piece: field(fields, "piece"),
        });
    }

    fn on_pin(&self, fields: &HashMap<String, String>) {
        self.record_instant_event(PinEvent {
            pinned: field(fields, "pinned"),
            pinner: field(fields, "pinner"),
        });
    }

    fn on_move_applied(&self, fields: &HashMap<String, String>) {
        self.record_instant_event(MoveAppliedEvent {
            mov: field(fields, "mov"),
            side: field(fields, "side"),
        });
    }

    fn on_aspect_term(&self, fields: &HashMap<String, String>) {
        self.record_instant_event(AspectTermEvent {
            side: field(fields, "side"),
            aspect: field(fields, "aspect"),
            value: field(fields, "value").parse().unwrap_or_default(),
            weighted: field(fields, "weighted").parse().unwrap_or_default(),
        });
    }
}

fn field(fields: &HashMap<String, String>, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

impl<S: Subscriber> Layer<S> for GameRecordLayer
where
    S: for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let span = match ctx.span(id) {
            Some(span) => span,
            None => return,
        };

        match span.name() {
            constants::LEGALITY_PASS => {
                let fields = attrs.extract_fields();
                self.record_start_event(
                    id,
                    LegalityPassStartEvent {
                        to_move: field(&fields, "to_move"),
                    },
                );
            }
            constants::EVALUATE => self.record_start_event(id, EvaluateStartEvent {}),
            _ => {}
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let span = match ctx.span(&id) {
            Some(span) => span,
            None => return,
        };

        match span.name() {
            constants::LEGALITY_PASS => self.record_end_event(&id, LegalityPassEndEvent {}),
            constants::EVALUATE => self.on_evaluate_exit(&id),
            _ => {}
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let fields = event.extract_fields();
        // Not all events have `event` keys (e.g. mundane logs from other modules).
        // Ignore the ones we don't care about.
        if let Some(event_str) = fields.get("event") {
            match event_str.as_ref() {
                constants::CHECK => self.on_check(&fields),
                constants::PIN => self.on_pin(&fields),
                constants::MOVE_APPLIED => self.on_move_applied(&fields),
                constants::ASPECT_TERM => self.on_aspect_term(&fields),
                _ => {}
            }
        }
    }
}

/// Reads back a record written by a `GameRecordLayer`.
pub fn read_record<R: BufRead>(reader: R) -> io::Result<Vec<GameEvent>> {
    let mut events = vec![];
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        events.push(serde_json::from_str(&line).map_err(io::Error::from)?);
    }

    Ok(events)
}

trait HasExtractableFields {
    fn extract_fields(&self) -> HashMap<String, String>;
}

impl HasExtractableFields for Attributes<'_> {
    fn extract_fields(&self) -> HashMap<String, String> {
        let mut extractor = HashMapExtractor(HashMap::new());
        self.record(&mut extractor);
        extractor.0
    }
}

impl HasExtractableFields for Event<'_> {
    fn extract_fields(&self) -> HashMap<String, String> {
        let mut extractor = HashMapExtractor(HashMap::new());
        self.record(&mut extractor);
        extractor.0
    }
}

struct HashMapExtractor(HashMap<String, String>);

impl Visit for HashMapExtractor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.0
            .insert(field.name().to_owned(), format!("{:?}", value));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tracing_subscriber::prelude::*;

    use super::*;
    use crate::{eval::Weights, game::Game};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn records_passes_moves_and_checks() {
        let buffer = SharedBuffer::default();
        let subscriber = tracing_subscriber::registry().with(GameRecordLayer::new(buffer.clone()));
        tracing::subscriber::with_default(subscriber, || {
            let mut game = Game::new(Weights::default());
            for mov in ["e2e4", "f7f6", "d1h5"] {
                game.make_uci_move(mov).unwrap();
            }
        });

        let bytes = buffer.0.lock().unwrap().clone();
        let events = read_record(io::Cursor::new(bytes)).unwrap();
        let passes = events
            .iter()
            .filter(|e| matches!(&e.kind, GameEventKind::Start(StartEvent { kind: StartEventKind::LegalityPass(_), .. })))
            .count();
        assert_eq!(passes, 4);

        let moves: Vec<_> = events
            .iter()
            .filter_map(|e| match &e.kind {
                GameEventKind::Instant(InstantEvent {
                    kind: InstantEventKind::MoveApplied(applied),
                }) => Some(applied.mov.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(moves, vec!["e2e4", "f7f6", "d1h5"]);

        let checks: Vec<_> = events
            .iter()
            .filter_map(|e| match &e.kind {
                GameEventKind::Instant(InstantEvent {
                    kind: InstantEventKind::Check(check),
                }) => Some(check.attacker.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(checks, vec!["h5"]);
    }
}
