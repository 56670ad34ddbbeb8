use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use storage::models::NewPerson;

use crate::error::{PredictorError, Result};
use crate::observer::{EnrichmentObserver, TracingObserver};
use crate::predictors::{
    AgePredictor, DEFAULT_AGE_API_URL, DEFAULT_GENDER_API_URL, DEFAULT_NATIONALITY_API_URL,
    GenderPredictor, NationalityPredictor, build_client,
};
use crate::traits::Predictor;

pub const DEFAULT_PREDICTOR_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the predictors live and how long each may take.
#[derive(Debug, Clone)]
pub struct EnrichmentSettings {
    pub age_url: String,
    pub gender_url: String,
    pub nationality_url: String,
    pub timeout: Duration,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            age_url: DEFAULT_AGE_API_URL.to_string(),
            gender_url: DEFAULT_GENDER_API_URL.to_string(),
            nationality_url: DEFAULT_NATIONALITY_API_URL.to_string(),
            timeout: DEFAULT_PREDICTOR_TIMEOUT,
        }
    }
}

/// Outcome of one enrichment run, one slot per predictor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

impl Enrichment {
    pub fn predicted_count(&self) -> usize {
        [
            self.age.is_some(),
            self.gender.is_some(),
            self.nationality.is_some(),
        ]
        .into_iter()
        .filter(|hit| *hit)
        .count()
    }

    /// Writes the successful predictions. Slots without a value leave the
    /// person untouched.
    pub fn apply(self, person: &mut NewPerson) {
        if let Some(age) = self.age {
            person.age = Some(age);
        }
        if let Some(gender) = self.gender {
            person.gender = Some(gender);
        }
        if let Some(nationality) = self.nationality {
            person.nationality = Some(nationality);
        }
    }
}

/// Fans a name out to the age, gender and nationality predictors.
pub struct Enricher {
    age: Arc<dyn Predictor<Value = i32>>,
    gender: Arc<dyn Predictor<Value = String>>,
    nationality: Arc<dyn Predictor<Value = String>>,
    timeout: Duration,
    observer: Arc<dyn EnrichmentObserver>,
}

impl Enricher {
    pub fn new(
        age: Arc<dyn Predictor<Value = i32>>,
        gender: Arc<dyn Predictor<Value = String>>,
        nationality: Arc<dyn Predictor<Value = String>>,
        timeout: Duration,
    ) -> Self {
        Self {
            age,
            gender,
            nationality,
            timeout,
            observer: Arc::new(TracingObserver),
        }
    }

    /// HTTP predictors sharing one client.
    pub fn from_settings(settings: &EnrichmentSettings) -> Result<Self> {
        let client = build_client(settings.timeout)?;

        Ok(Self::new(
            Arc::new(AgePredictor::new(client.clone(), &settings.age_url)),
            Arc::new(GenderPredictor::new(client.clone(), &settings.gender_url)),
            Arc::new(NationalityPredictor::new(client, &settings.nationality_url)),
            settings.timeout,
        ))
    }

    pub fn with_observer(mut self, observer: Arc<dyn EnrichmentObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Runs all three predictors concurrently. Never fails: a predictor that
    /// errors or exceeds the timeout leaves its slot empty.
    pub async fn predict(&self, name: &str) -> Enrichment {
        self.observer.started(name);

        let (age, gender, nationality) = tokio::join!(
            self.attempt(self.age.as_ref(), name),
            self.attempt(self.gender.as_ref(), name),
            self.attempt(self.nationality.as_ref(), name),
        );

        let enrichment = Enrichment {
            age,
            gender,
            nationality,
        };
        self.observer.completed(name, &enrichment);

        enrichment
    }

    /// Enriches `person` in place using its given name only.
    pub async fn enrich(&self, person: &mut NewPerson) {
        let enrichment = self.predict(&person.name).await;
        enrichment.apply(person);
    }

    async fn attempt<V>(&self, predictor: &dyn Predictor<Value = V>, name: &str) -> Option<V>
    where
        V: Send + fmt::Display,
    {
        let kind = predictor.kind();
        let result = match tokio::time::timeout(self.timeout, predictor.predict(name)).await {
            Ok(result) => result,
            Err(_) => Err(PredictorError::Timeout(self.timeout)),
        };

        match result {
            Ok(value) => {
                self.observer.predicted(name, kind, &value);
                Some(value)
            }
            Err(error) => {
                self.observer.failed(name, kind, &error);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Instant;

    use super::*;

    enum Behaviour<V> {
        Answer(V),
        Status(u16),
        Unknown,
        Hang,
        Slow(Duration, V),
    }

    struct FakePredictor<V> {
        kind: &'static str,
        behaviour: Behaviour<V>,
        seen: Mutex<Vec<String>>,
    }

    impl<V> FakePredictor<V> {
        fn new(kind: &'static str, behaviour: Behaviour<V>) -> Arc<Self> {
            Arc::new(Self {
                kind,
                behaviour,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl<V: Clone + Send + Sync> Predictor for FakePredictor<V> {
        type Value = V;

        fn kind(&self) -> &'static str {
            self.kind
        }

        async fn predict(&self, name: &str) -> Result<V> {
            self.seen.lock().unwrap().push(name.to_string());
            match &self.behaviour {
                Behaviour::Answer(value) => Ok(value.clone()),
                Behaviour::Status(code) => Err(PredictorError::UpstreamStatus { code: *code }),
                Behaviour::Unknown => Err(PredictorError::NoPrediction),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Err(PredictorError::NoPrediction)
                }
                Behaviour::Slow(delay, value) => {
                    tokio::time::sleep(*delay).await;
                    Ok(value.clone())
                }
            }
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl EnrichmentObserver for RecordingObserver {
        fn predicted(&self, _name: &str, kind: &'static str, value: &dyn fmt::Display) {
            self.events.lock().unwrap().push(format!("{kind}={value}"));
        }

        fn failed(&self, _name: &str, kind: &'static str, error: &PredictorError) {
            let label = match error {
                PredictorError::Timeout(_) => "timeout",
                PredictorError::NoPrediction => "unknown",
                PredictorError::UpstreamStatus { .. } => "status",
                _ => "other",
            };
            self.events.lock().unwrap().push(format!("{kind}!{label}"));
        }
    }

    fn person(name: &str) -> NewPerson {
        NewPerson {
            name: name.to_string(),
            surname: "Ushakov".to_string(),
            patronymic: Some("Vasilevich".to_string()),
            ..Default::default()
        }
    }

    fn sorted(events: &Mutex<Vec<String>>) -> Vec<String> {
        let mut events = events.lock().unwrap().clone();
        events.sort();
        events
    }

    #[tokio::test]
    async fn test_all_predictions_are_applied() {
        let age = FakePredictor::new("age", Behaviour::Answer(42_i32));
        let gender = FakePredictor::new("gender", Behaviour::Answer("male".to_string()));
        let nationality = FakePredictor::new("nationality", Behaviour::Answer("RU".to_string()));
        let enricher = Enricher::new(
            age.clone(),
            gender.clone(),
            nationality.clone(),
            Duration::from_secs(1),
        );

        let mut target = person("Dmitriy");
        enricher.enrich(&mut target).await;

        assert_eq!(target.age, Some(42));
        assert_eq!(target.gender.as_deref(), Some("male"));
        assert_eq!(target.nationality.as_deref(), Some("RU"));
        assert_eq!(target.surname, "Ushakov");
        assert_eq!(*age.seen.lock().unwrap(), vec!["Dmitriy".to_string()]);
        assert_eq!(*gender.seen.lock().unwrap(), vec!["Dmitriy".to_string()]);
        assert_eq!(*nationality.seen.lock().unwrap(), vec!["Dmitriy".to_string()]);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_the_others() {
        let observer = Arc::new(RecordingObserver::default());
        let enricher = Enricher::new(
            FakePredictor::new("age", Behaviour::<i32>::Status(503)),
            FakePredictor::new("gender", Behaviour::Answer("female".to_string())),
            FakePredictor::new("nationality", Behaviour::Answer("US".to_string())),
            Duration::from_secs(1),
        )
        .with_observer(observer.clone());

        let mut target = person("Ann");
        enricher.enrich(&mut target).await;

        assert_eq!(target.age, None);
        assert_eq!(target.gender.as_deref(), Some("female"));
        assert_eq!(target.nationality.as_deref(), Some("US"));
        assert_eq!(
            sorted(&observer.events),
            vec!["age!status", "gender=female", "nationality=US"]
        );
    }

    #[tokio::test]
    async fn test_total_failure_leaves_fields_absent() {
        let observer = Arc::new(RecordingObserver::default());
        let enricher = Enricher::new(
            FakePredictor::new("age", Behaviour::<i32>::Unknown),
            FakePredictor::new("gender", Behaviour::<String>::Unknown),
            FakePredictor::new("nationality", Behaviour::<String>::Status(500)),
            Duration::from_secs(1),
        )
        .with_observer(observer.clone());

        let mut target = person("Zzqx");
        enricher.enrich(&mut target).await;

        assert_eq!(target, person("Zzqx"));
        assert_eq!(
            sorted(&observer.events),
            vec!["age!unknown", "gender!unknown", "nationality!status"]
        );
    }

    #[tokio::test]
    async fn test_hanging_predictors_time_out() {
        let observer = Arc::new(RecordingObserver::default());
        let enricher = Enricher::new(
            FakePredictor::new("age", Behaviour::<i32>::Hang),
            FakePredictor::new("gender", Behaviour::<String>::Hang),
            FakePredictor::new("nationality", Behaviour::<String>::Hang),
            Duration::from_millis(50),
        )
        .with_observer(observer.clone());

        let started = Instant::now();
        let enrichment = enricher.predict("Ann").await;

        assert_eq!(enrichment, Enrichment::default());
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(
            sorted(&observer.events),
            vec!["age!timeout", "gender!timeout", "nationality!timeout"]
        );
    }

    #[tokio::test]
    async fn test_predictors_run_concurrently() {
        let delay = Duration::from_millis(300);
        let enricher = Enricher::new(
            FakePredictor::new("age", Behaviour::Slow(delay, 30_i32)),
            FakePredictor::new("gender", Behaviour::Slow(delay, "female".to_string())),
            FakePredictor::new("nationality", Behaviour::Slow(delay, "GB".to_string())),
            Duration::from_secs(5),
        );

        let started = Instant::now();
        let enrichment = enricher.predict("Ann").await;

        assert_eq!(enrichment.predicted_count(), 3);
        assert!(started.elapsed() < delay * 3);
    }

    #[tokio::test]
    async fn test_failed_slot_keeps_existing_value() {
        let enricher = Enricher::new(
            FakePredictor::new("age", Behaviour::<i32>::Unknown),
            FakePredictor::new("gender", Behaviour::Answer("male".to_string())),
            FakePredictor::new("nationality", Behaviour::<String>::Unknown),
            Duration::from_secs(1),
        );

        let mut target = person("Ivan");
        target.age = Some(20);
        enricher.enrich(&mut target).await;

        assert_eq!(target.age, Some(20));
        assert_eq!(target.gender.as_deref(), Some("male"));
        assert_eq!(target.nationality, None);
    }

    #[tokio::test]
    async fn test_out_of_range_answers_leave_fields_absent() {
        use axum::{Json, Router, routing::get};

        let router = Router::new().route(
            "/",
            get(|| async {
                Json(serde_json::json!({
                    "age": -7,
                    "gender": "unknown",
                    "probability": 0.5,
                    "country": [{ "country_id": "TOO-LONG-CODE", "probability": 0.9 }]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let settings = EnrichmentSettings {
            age_url: base.clone(),
            gender_url: base.clone(),
            nationality_url: base,
            timeout: Duration::from_secs(2),
        };
        let observer = Arc::new(RecordingObserver::default());
        let enricher = Enricher::from_settings(&settings)
            .unwrap()
            .with_observer(observer.clone());

        let mut target = person("Ann");
        enricher.enrich(&mut target).await;

        assert_eq!(target, person("Ann"));
        assert_eq!(
            sorted(&observer.events),
            vec!["age!unknown", "gender!unknown", "nationality!unknown"]
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoints_never_fail() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let settings = EnrichmentSettings {
            age_url: base.clone(),
            gender_url: base.clone(),
            nationality_url: base,
            timeout: Duration::from_millis(500),
        };
        let enricher = Enricher::from_settings(&settings)
            .unwrap()
            .with_observer(Arc::new(crate::observer::NoopObserver));

        let enrichment = enricher.predict("Ann").await;
        assert_eq!(enrichment, Enrichment::default());
    }
}
