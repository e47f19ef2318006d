// Classification pass: labels every post in the corpus with one topic.
//
// Posts that arrive already labeled keep their label unless the caller asks
// for reclassification, but the label still has to exist in the taxonomy.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::error::TrendsError;
use crate::models::Post;
use crate::topics::traits::TopicClassifier;

/// How the classification pass went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyStats {
    /// Posts labeled by the classifier in this pass
    pub classified: usize,
    /// Posts whose existing label was kept
    pub kept_labels: usize,
    /// Posts that landed in the fallback topic
    pub fallback: usize,
}

/// Options for a classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Ignore existing labels and classify everything again
    pub reclassify: bool,
    /// Draw a progress bar on stderr
    pub progress: bool,
}

/// Label every post. Output order matches input order.
pub fn classify_posts(
    posts: Vec<Post>,
    classifier: &dyn TopicClassifier,
    options: ClassifyOptions,
) -> Result<(Vec<Post>, ClassifyStats), TrendsError> {
    let taxonomy = classifier.taxonomy();
    let fallback = taxonomy.fallback().to_string();

    let pb = if options.progress {
        let pb = ProgressBar::new(posts.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("  Classifying [{bar:30}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut stats = ClassifyStats {
        classified: 0,
        kept_labels: 0,
        fallback: 0,
    };
    let mut labeled = Vec::with_capacity(posts.len());

    for post in posts {
        let post = match post.topic.as_deref() {
            Some(existing) if !options.reclassify => {
                if !taxonomy.contains(existing) {
                    pb.finish_and_clear();
                    return Err(TrendsError::UnknownTopic {
                        post_id: post.id.clone(),
                        topic: existing.to_string(),
                    });
                }
                stats.kept_labels += 1;
                post
            }
            _ => {
                let topic = classifier.classify(&post.title, &post.body);
                debug!(id = %post.id, topic = %topic, "Classified post");
                stats.classified += 1;
                post.with_topic(topic)
            }
        };

        if post.topic.as_deref() == Some(fallback.as_str()) {
            stats.fallback += 1;
        }
        labeled.push(post);
        pb.inc(1);
    }

    pb.finish_and_clear();

    info!(
        classified = stats.classified,
        kept_labels = stats.kept_labels,
        fallback = stats.fallback,
        "Classification complete"
    );
    Ok((labeled, stats))
}
