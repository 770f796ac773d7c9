use logfeed::{LogFeed, Severity};
use std::sync::Arc;
use tokio::join;

#[tokio::main]
async fn main() {
    let feed = Arc::new(LogFeed::new(8).expect("capacity is positive"));
    let signal = feed.change_signal();

    let viewer_feed = Arc::clone(&feed);
    let viewer = tokio::spawn(async move {
        loop {
            signal.changed().await;
            let lines: Vec<_> = viewer_feed.all().map(|e| e.to_string()).collect();
            println!("{} entries, newest: {:?}", lines.len(), lines.last());
            if lines.iter().any(|line| line.ends_with("done")) {
                break;
            }
        }
    });

    let feed_cloned = Arc::clone(&feed);
    let producer1 = tokio::spawn(async move {
        for i in 1..32 {
            feed_cloned.append(Severity::Debug, format!("tick {i}"));
            tokio::task::yield_now().await;
        }
    });

    let feed_cloned = Arc::clone(&feed);
    let producer2 = tokio::spawn(async move {
        for i in 32..64 {
            feed_cloned.append(Severity::Info, format!("tock {i}"));
            tokio::task::yield_now().await;
        }
    });

    let _ = join!(producer1, producer2);
    feed.append(Severity::Info, "done");
    let _ = viewer.await;

    for entry in feed.all() {
        println!("{entry}");
    }
}
