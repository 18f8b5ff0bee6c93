//! Scripted in-memory WeatherClient for dashboard tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use weatherdash_weather::{
    ClientError, Datum, HistorySeries, Reading, SavePayload, WeatherClient,
};

/// One scripted answer. Once a script runs out the fallback value is used.
pub enum Reply<T> {
    Ok(T),
    Fail,
    After(Duration, T),
}

pub struct FakeWeatherClient {
    current: Mutex<VecDeque<Reply<Reading>>>,
    recent: Mutex<VecDeque<Reply<Vec<Reading>>>>,
    history: Mutex<VecDeque<Reply<HistorySeries>>>,
    fallback_current: Reading,
    fallback_recent: Vec<Reading>,
    fallback_history: HistorySeries,
    saved: Mutex<Vec<SavePayload>>,
    current_calls: AtomicUsize,
    recent_calls: AtomicUsize,
    history_calls: AtomicUsize,
    save_calls: AtomicUsize,
}

pub fn sample_history() -> HistorySeries {
    HistorySeries {
        temperature: vec![Datum::from("10"), Datum::from("12"), Datum::from("9")],
        timestamp: vec![Datum::from(1), Datum::from(2), Datum::from(3)],
    }
}

impl FakeWeatherClient {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(VecDeque::new()),
            recent: Mutex::new(VecDeque::new()),
            history: Mutex::new(VecDeque::new()),
            fallback_current: Reading::new(20.0, "2024-10-05T12:00"),
            fallback_recent: vec![
                Reading::new(19.5, "2024-10-05T11:00"),
                Reading::new(18.0, "2024-10-05T10:00"),
            ],
            fallback_history: sample_history(),
            saved: Mutex::new(Vec::new()),
            current_calls: AtomicUsize::new(0),
            recent_calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
            save_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_current(self, replies: Vec<Reply<Reading>>) -> Self {
        self.current.lock().extend(replies);
        self
    }

    pub fn with_recent(self, replies: Vec<Reply<Vec<Reading>>>) -> Self {
        self.recent.lock().extend(replies);
        self
    }

    pub fn with_history(self, replies: Vec<Reply<HistorySeries>>) -> Self {
        self.history.lock().extend(replies);
        self
    }

    pub fn current_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }

    pub fn recent_calls(&self) -> usize {
        self.recent_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn saved(&self) -> Vec<SavePayload> {
        self.saved.lock().clone()
    }

    pub fn fallback_recent(&self) -> Vec<Reading> {
        self.fallback_recent.clone()
    }
}

async fn resolve<T: Clone>(queue: &Mutex<VecDeque<Reply<T>>>, fallback: &T) -> Result<T, ClientError> {
    let next = queue.lock().pop_front();
    match next {
        None => Ok(fallback.clone()),
        Some(Reply::Ok(value)) => Ok(value),
        Some(Reply::Fail) => Err(ClientError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }),
        Some(Reply::After(delay, value)) => {
            tokio::time::sleep(delay).await;
            Ok(value)
        }
    }
}

#[async_trait]
impl WeatherClient for FakeWeatherClient {
    async fn get_current(&self) -> Result<Reading, ClientError> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        resolve(&self.current, &self.fallback_current).await
    }

    async fn get_recent(&self) -> Result<Vec<Reading>, ClientError> {
        self.recent_calls.fetch_add(1, Ordering::SeqCst);
        resolve(&self.recent, &self.fallback_recent).await
    }

    async fn get_history(&self) -> Result<HistorySeries, ClientError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        resolve(&self.history, &self.fallback_history).await
    }

    async fn save(&self, payload: &SavePayload) -> Result<(), ClientError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.saved.lock().push(payload.clone());
        Ok(())
    }
}

/// Let every ready task run without moving the clock meaningfully.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub async fn advance_secs(secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
}
