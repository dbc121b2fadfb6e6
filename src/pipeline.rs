use crate::analyzer::ChangeCalculator;
use crate::market::MarketData;
use crate::model::{CalcError, MarketDataError, PriceChange};
use crate::news::NewsSource;
use crate::notifier::{DispatchReport, Notifier};
use tracing::{error, info, warn};

#[derive(Debug)]
pub enum AbortReason {
    MarketData(MarketDataError),
    Calculation(CalcError),
}

/// Terminal state of one run.
#[derive(Debug)]
pub enum Outcome {
    Aborted(AbortReason),
    BelowThreshold(PriceChange),
    NoArticles(PriceChange),
    Notified {
        change: PriceChange,
        report: DispatchReport,
    },
}

/// Fetch prices, compute the change, and alert with headlines when it is large enough.
pub struct Pipeline<'a> {
    pub market: &'a dyn MarketData,
    pub calculator: &'a dyn ChangeCalculator,
    pub news: &'a dyn NewsSource,
    pub notifier: &'a Notifier,
    pub symbol: &'a str,
    pub company_name: &'a str,
    pub alert_threshold: f64,
    pub article_limit: usize,
}

impl Pipeline<'_> {
    pub async fn run(&self) -> Outcome {
        let series = match self.market.fetch_daily_series(self.symbol).await {
            Ok(series) => series,
            Err(e) => {
                error!("Failed to retrieve stock data: {}", e);
                return Outcome::Aborted(AbortReason::MarketData(e));
            }
        };
        info!("Fetched {} daily closes for {}", series.len(), self.symbol);

        let change = match self.calculator.compute_change(&series) {
            Ok(change) => change,
            Err(e) => {
                error!("Failed to calculate price change: {}", e);
                return Outcome::Aborted(AbortReason::Calculation(e));
            }
        };
        info!("{} price change: {}%", self.symbol, change.percent_change);

        let magnitude = change.percent_change.abs();
        if magnitude <= self.alert_threshold {
            info!("No alert needed. Price change: {}%", change.percent_change);
            return Outcome::BelowThreshold(change);
        }
        info!("Alert threshold met: {}% > {}%", magnitude, self.alert_threshold);

        let articles = self
            .news
            .fetch_top_articles(self.company_name, self.article_limit)
            .await;
        if articles.is_empty() {
            warn!("No news articles found for '{}'", self.company_name);
            return Outcome::NoArticles(change);
        }

        let report = self.notifier.dispatch(&change, &articles).await;
        info!("Alerts dispatched: {} sent, {} failed", report.sent, report.failed);
        Outcome::Notified { change, report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ChangeCalculatorImpl;
    use crate::model::{Article, DailyBar, Direction, PriceSeries};
    use crate::notifier::tests::RecordingMessenger;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeMarket {
        closes: Option<Vec<&'static str>>,
        calls: AtomicUsize,
    }

    impl FakeMarket {
        fn with_closes(closes: &[&'static str]) -> Self {
            Self {
                closes: Some(closes.to_vec()),
                calls: AtomicUsize::new(0),
            }
        }

        fn missing_series() -> Self {
            Self {
                closes: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl MarketData for FakeMarket {
        async fn fetch_daily_series(&self, _symbol: &str) -> Result<PriceSeries, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let Some(closes) = &self.closes else {
                return crate::market::fetcher::parse_daily_series(r#"{ "Information": "rate limited" }"#);
            };
            let newest = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
            Ok(closes
                .iter()
                .enumerate()
                .map(|(i, close)| {
                    (
                        newest - chrono::Duration::days(i as i64),
                        DailyBar {
                            close: close.to_string(),
                        },
                    )
                })
                .collect())
        }
    }

    /// Counts calls so tests can check the calculator was never reached.
    #[derive(Default)]
    struct CountingCalculator {
        calls: AtomicUsize,
    }

    impl ChangeCalculator for CountingCalculator {
        fn compute_change(&self, series: &PriceSeries) -> Result<PriceChange, CalcError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ChangeCalculatorImpl::new().compute_change(series)
        }
    }

    struct FakeNews {
        articles: Vec<Article>,
        calls: AtomicUsize,
    }

    impl FakeNews {
        fn with(count: usize) -> Self {
            Self {
                articles: (0..count)
                    .map(|i| Article {
                        title: Some(format!("Headline {}", i)),
                        description: None,
                    })
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl NewsSource for FakeNews {
        async fn fetch_top_articles(&self, _company_name: &str, limit: usize) -> Vec<Article> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.articles.iter().take(limit).cloned().collect()
        }
    }

    struct Harness {
        market: FakeMarket,
        calculator: CountingCalculator,
        news: FakeNews,
        messenger: Arc<RecordingMessenger>,
        notifier: Notifier,
    }

    impl Harness {
        fn new(market: FakeMarket, news: FakeNews) -> Self {
            let messenger = Arc::new(RecordingMessenger::default());
            let notifier = Notifier::new(
                Box::new(messenger.clone()),
                "TSLA".into(),
                "whatsapp:+1000".into(),
                "whatsapp:+2000".into(),
            );
            Self {
                market,
                calculator: CountingCalculator::default(),
                news,
                messenger,
                notifier,
            }
        }

        async fn run(&self) -> Outcome {
            Pipeline {
                market: &self.market,
                calculator: &self.calculator,
                news: &self.news,
                notifier: &self.notifier,
                symbol: "TSLA",
                company_name: "Tesla Inc",
                alert_threshold: 1.0,
                article_limit: 3,
            }
            .run()
            .await
        }

        fn messages_sent(&self) -> usize {
            self.messenger.sent.lock().unwrap().len()
        }
    }

    #[tokio::test]
    async fn large_move_fetches_news_and_notifies_each_article() {
        let h = Harness::new(FakeMarket::with_closes(&["100.0", "98.0"]), FakeNews::with(3));

        let outcome = h.run().await;

        let Outcome::Notified { change, report } = outcome else {
            panic!("expected Notified, got {:?}", outcome);
        };
        assert_eq!(change.percent_change, 2.0);
        assert_eq!(change.direction, Direction::Up);
        assert_eq!(report, DispatchReport { sent: 3, failed: 0 });
        assert_eq!(h.news.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.messages_sent(), 3);
    }

    #[tokio::test]
    async fn small_move_skips_news_and_notifier() {
        let h = Harness::new(FakeMarket::with_closes(&["100.0", "99.5"]), FakeNews::with(3));

        let outcome = h.run().await;

        assert!(matches!(outcome, Outcome::BelowThreshold(c) if c.percent_change == 0.5));
        assert_eq!(h.news.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.messages_sent(), 0);
    }

    #[tokio::test]
    async fn large_drop_also_alerts() {
        let h = Harness::new(FakeMarket::with_closes(&["95.0", "100.0"]), FakeNews::with(1));

        let outcome = h.run().await;

        assert!(matches!(outcome, Outcome::Notified { change, .. } if change.direction == Direction::Down));
        assert_eq!(h.messages_sent(), 1);
    }

    #[tokio::test]
    async fn change_equal_to_threshold_does_not_alert() {
        let h = Harness::new(FakeMarket::with_closes(&["100.0", "99.0"]), FakeNews::with(3));

        assert!(matches!(h.run().await, Outcome::BelowThreshold(_)));
        assert_eq!(h.news.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_series_aborts_before_anything_else() {
        let h = Harness::new(FakeMarket::missing_series(), FakeNews::with(3));

        let outcome = h.run().await;

        assert!(matches!(
            outcome,
            Outcome::Aborted(AbortReason::MarketData(MarketDataError::Schema(_)))
        ));
        assert_eq!(h.market.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.calculator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.news.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.messages_sent(), 0);
    }

    #[tokio::test]
    async fn single_close_aborts_in_calculation() {
        let h = Harness::new(FakeMarket::with_closes(&["100.0"]), FakeNews::with(3));

        let outcome = h.run().await;

        assert!(matches!(
            outcome,
            Outcome::Aborted(AbortReason::Calculation(CalcError::InsufficientData(1)))
        ));
        assert_eq!(h.news.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_articles_ends_without_notifying() {
        let h = Harness::new(FakeMarket::with_closes(&["100.0", "90.0"]), FakeNews::with(0));

        let outcome = h.run().await;

        assert!(matches!(outcome, Outcome::NoArticles(_)));
        assert_eq!(h.news.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.messages_sent(), 0);
    }

    #[tokio::test]
    async fn article_limit_caps_messages() {
        let h = Harness::new(FakeMarket::with_closes(&["100.0", "90.0"]), FakeNews::with(10));

        h.run().await;

        assert_eq!(h.messages_sent(), 3);
    }
}
