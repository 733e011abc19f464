// wisp-core - Stream engine
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Lazy, single-pass, pull-based streams.
//!
//! A stream answers two questions: `next` (the next element, or nil once
//! exhausted) and `has_next` (non-consuming, idempotent). The cursor state
//! lives in [`StreamState`]; this module drives it.
//!
//! Production callables may themselves pull from streams, so no `RefCell`
//! borrow of a stream is held across a call to [`apply`].

use wisp_reader::{Stream, StreamState, Value};

use crate::error::{Error, Result};
use crate::eval::apply;

/// What `next` does once the state borrow has been released.
enum Pull {
    Done(Value),
    Produce(Value),
    Map(Value, Stream),
    Chain,
}

/// What `has_next` does once the state borrow has been released.
enum Probe {
    Available(Value),
    PullAhead(Value),
    Source(Stream),
    Chain,
}

/// Pull the next element; nil once exhausted.
pub fn next(stream: &Stream) -> Result<Value> {
    let pull = {
        let mut state = stream.state().borrow_mut();
        match &mut *state {
            StreamState::Empty => Pull::Done(Value::Nil),
            StreamState::Sequence { items, cursor } => match items.get(*cursor) {
                Some(item) => {
                    *cursor += 1;
                    Pull::Done(item.clone())
                }
                None => Pull::Done(Value::Nil),
            },
            StreamState::Procedure {
                produce, cached, ..
            } => match cached.take() {
                Some(value) => Pull::Done(value),
                None => Pull::Produce(produce.clone()),
            },
            StreamState::Mapped { func, source } => Pull::Map(func.clone(), source.clone()),
            StreamState::Chain { .. } => Pull::Chain,
        }
    };

    match pull {
        Pull::Done(value) => Ok(value),
        Pull::Produce(produce) => apply(&produce, &[]),
        Pull::Map(func, source) => match next(&source)? {
            Value::Nil => Ok(Value::Nil),
            item => apply(&func, &[item]),
        },
        Pull::Chain => chain_next(stream),
    }
}

/// Whether another element is available. Never consumes one.
pub fn has_next(stream: &Stream) -> Result<bool> {
    let probe = {
        let state = stream.state().borrow();
        match &*state {
            StreamState::Empty => return Ok(false),
            StreamState::Sequence { items, cursor } => return Ok(*cursor < items.len()),
            StreamState::Procedure {
                available: Some(available),
                ..
            } => Probe::Available(available.clone()),
            StreamState::Procedure {
                cached: Some(_), ..
            } => return Ok(true),
            StreamState::Procedure { produce, .. } => Probe::PullAhead(produce.clone()),
            StreamState::Mapped { source, .. } => Probe::Source(source.clone()),
            StreamState::Chain { .. } => Probe::Chain,
        }
    };

    match probe {
        Probe::Available(available) => Ok(apply(&available, &[])?.is_truthy()),
        Probe::PullAhead(produce) => {
            // No availability callable: pull one ahead and keep it
            let value = apply(&produce, &[])?;
            if matches!(value, Value::Nil) {
                return Ok(false);
            }
            if let StreamState::Procedure { cached, .. } = &mut *stream.state().borrow_mut() {
                *cached = Some(value);
            }
            Ok(true)
        }
        Probe::Source(source) => has_next(&source),
        Probe::Chain => {
            let current = chain_current(stream);
            match current {
                Some(current) if has_next(&current)? => Ok(true),
                _ => chain_advance(stream),
            }
        }
    }
}

// ============================================================================
// Construction
// ============================================================================

/// Build a stream from the arguments of `stream`:
/// nil gives an empty stream, a list its elements, a callable (with an
/// optional availability callable) a procedure stream, a stream itself, and
/// anything else the argument list as a sequence.
#[must_use]
pub fn from_args(args: &[Value]) -> Stream {
    match args.first() {
        None | Some(Value::Nil) => Stream::empty(),
        Some(Value::List(items)) => Stream::from_items(items.clone()),
        Some(Value::Stream(s)) => s.clone(),
        Some(produce @ (Value::Closure(_) | Value::MultiFn(_) | Value::NativeFn(_))) => {
            let available = args.get(1).filter(|v| v.is_callable()).cloned();
            from_procedure(produce.clone(), available)
        }
        Some(_) => Stream::from_items(args.iter().cloned().collect()),
    }
}

#[must_use]
pub fn from_procedure(produce: Value, available: Option<Value>) -> Stream {
    Stream::new(StreamState::Procedure {
        produce,
        available,
        cached: None,
    })
}

/// Elements of `source` passed through `func` as they are pulled.
#[must_use]
pub fn map(func: Value, source: Stream) -> Stream {
    Stream::new(StreamState::Mapped { func, source })
}

/// Each stream drained in turn.
#[must_use]
pub fn chain(streams: Vec<Stream>) -> Stream {
    if streams.is_empty() {
        return Stream::empty();
    }
    Stream::new(StreamState::Chain {
        streams,
        current: 0,
    })
}

pub(crate) fn expect_stream(context: &'static str, value: &Value) -> Result<Stream> {
    match value {
        Value::Stream(s) => Ok(s.clone()),
        other => Err(Error::type_error_in(context, "stream", other)),
    }
}

// ============================================================================
// Chain cursor
// ============================================================================

fn chain_current(stream: &Stream) -> Option<Stream> {
    match &*stream.state().borrow() {
        StreamState::Chain { streams, current } => {
            streams.get(*current).or_else(|| streams.last()).cloned()
        }
        _ => None,
    }
}

/// Move past the current stream to the next one reporting an element.
fn chain_advance(stream: &Stream) -> Result<bool> {
    loop {
        let candidate = match &mut *stream.state().borrow_mut() {
            StreamState::Chain { streams, current } => {
                if *current + 1 < streams.len() {
                    *current += 1;
                    Some(streams[*current].clone())
                } else {
                    *current = streams.len();
                    None
                }
            }
            _ => None,
        };
        match candidate {
            Some(candidate) => {
                if has_next(&candidate)? {
                    return Ok(true);
                }
            }
            None => return Ok(false),
        }
    }
}

fn chain_next(stream: &Stream) -> Result<Value> {
    let Some(current) = chain_current(stream) else {
        return Ok(Value::Nil);
    };
    match next(&current)? {
        Value::Nil => {
            if !chain_advance(stream)? {
                return Ok(Value::Nil);
            }
            match chain_current(stream) {
                Some(current) => next(&current),
                None => Ok(Value::Nil),
            }
        }
        value => Ok(value),
    }
}
