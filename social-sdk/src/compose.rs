//! Publishing new text, optionally with an image.
//!
//! Publishing is two sequential requests: the text is created first, then the
//! attached image is uploaded keyed to the new publication's id. A failed
//! upload does not undo the text; the image is kept so
//! [`Composer::retry_image`] can send it again. Several images can wait at
//! once; they are retried oldest first.

use std::collections::VecDeque;
use std::future::Future;

use social_common::{
    Publication,
    constants::{COUNTER_WARNING_PERCENT, MAX_PUBLICATION_CHARS},
};

use crate::{
    Error, ImageUpload, Result, SessionContext, SocialApi, cross_log,
    errors::ValidationError,
    notify::{SharedNotifier, Toast},
};

/// Presentation of the character counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterTone {
    /// Well below the limit.
    Normal,
    /// Above 80 % of the limit.
    Warning,
    /// Beyond the limit; submitting is refused.
    Over,
}

/// How a successful [`Composer::submit`] ended.
#[derive(Debug)]
pub enum ComposeOutcome {
    /// Text and image (if any) were both published.
    Published(Publication),
    /// The text was published but the image upload failed.
    ///
    /// The image is kept; see [`Composer::retry_image`].
    ImagePending {
        /// The publication as created, without its image.
        publication: Publication,
        /// Why the upload failed.
        error: Error,
    },
}

impl ComposeOutcome {
    /// The created publication.
    pub fn publication(&self) -> &Publication {
        match self {
            ComposeOutcome::Published(publication)
            | ComposeOutcome::ImagePending { publication, .. } => publication,
        }
    }
}

/// Draft state of a new publication.
#[derive(Debug)]
pub struct Composer {
    session: SessionContext,
    notifier: SharedNotifier,
    text: String,
    attachment: Option<ImageUpload>,
    pending: VecDeque<(Publication, ImageUpload)>,
}

impl Composer {
    /// An empty draft published as the viewer of `session`.
    pub fn new(session: SessionContext, notifier: SharedNotifier) -> Self {
        Self {
            session,
            notifier,
            text: String::new(),
            attachment: None,
            pending: VecDeque::new(),
        }
    }

    // === Draft ===

    /// Replace the draft text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The draft text as typed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attach `image`, replacing any previous attachment.
    pub fn attach(&mut self, image: ImageUpload) {
        self.attachment = Some(image);
    }

    /// Drop the attachment, returning it.
    pub fn remove_attachment(&mut self) -> Option<ImageUpload> {
        self.attachment.take()
    }

    /// The attached image, if any.
    pub fn attachment(&self) -> Option<&ImageUpload> {
        self.attachment.as_ref()
    }

    /// Length of the draft in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Tone of the character counter.
    pub fn counter_tone(&self) -> CounterTone {
        let count = self.char_count();
        if count > MAX_PUBLICATION_CHARS {
            CounterTone::Over
        } else if count * 100 > MAX_PUBLICATION_CHARS * COUNTER_WARNING_PERCENT {
            CounterTone::Warning
        } else {
            CounterTone::Normal
        }
    }

    /// Check the draft without touching the network.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let count = self.char_count();
        if count > MAX_PUBLICATION_CHARS {
            return Err(ValidationError::TextTooLong(count));
        }
        Ok(())
    }

    /// Whether [`submit`](Self::submit) would issue a request.
    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// The publication whose image [`retry_image`](Self::retry_image) sends
    /// next, if any.
    pub fn pending_image(&self) -> Option<&Publication> {
        self.pending.front().map(|(publication, _)| publication)
    }

    /// Every publication still waiting for its image, oldest first.
    pub fn pending_images(&self) -> impl Iterator<Item = &Publication> {
        self.pending.iter().map(|(publication, _)| publication)
    }

    // === Publishing ===

    /// Publish the draft.
    ///
    /// Invalid drafts are refused before any request. Once the text is
    /// created the draft is reset and `on_created` runs, whether or not the
    /// image upload that follows succeeds.
    pub async fn submit<F, Fut>(&mut self, on_created: F) -> Result<ComposeOutcome>
    where
        F: FnOnce(Publication) -> Fut,
        Fut: Future<Output = ()>,
    {
        if let Err(invalid) = self.validate() {
            let error = Error::from(invalid);
            self.notifier.notify(Toast::error(&error));
            return Err(error);
        }

        let api = self.session.api();
        let publication = match api.create_publication(&self.text).await {
            Ok(publication) => publication,
            Err(error) => return Err(self.report(&api, error)),
        };

        self.text.clear();
        let outcome = match self.attachment.take() {
            None => ComposeOutcome::Published(publication),
            Some(image) => match api.upload_publication_image(&publication.id, &image).await {
                Ok(uploaded) => ComposeOutcome::Published(uploaded.unwrap_or(publication)),
                Err(error) => {
                    cross_log!(warn, "Publication {} saved without its image", publication.id);
                    let error = self.report(&api, error);
                    self.pending.push_back((publication.clone(), image));
                    ComposeOutcome::ImagePending { publication, error }
                }
            },
        };

        if let ComposeOutcome::Published(_) = outcome {
            self.notifier
                .notify(Toast::info("Published", "Your publication was shared"));
        }
        on_created(outcome.publication().clone()).await;
        Ok(outcome)
    }

    /// Upload the oldest image left over by a failed submit.
    ///
    /// On failure the image stays first in line.
    pub async fn retry_image(&mut self) -> Result<Publication> {
        let Some((publication, image)) = self.pending.pop_front() else {
            return Err(ValidationError::Invalid("No image is waiting to be uploaded".into()).into());
        };

        let api = self.session.api();
        match api.upload_publication_image(&publication.id, &image).await {
            Ok(uploaded) => {
                self.notifier
                    .notify(Toast::info("Published", "The image was added"));
                Ok(uploaded.unwrap_or(publication))
            }
            Err(error) => {
                self.pending.push_front((publication, image));
                Err(self.report(&api, error))
            }
        }
    }

    fn report(&self, api: &SocialApi, error: Error) -> Error {
        self.session.expire_if_unauthorized(api, &error);
        self.notifier.notify(Toast::error(&error));
        error
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{MemorySessionStore, SocialHttpClient, notify::ToastQueue};

    fn composer() -> (Composer, ToastQueue) {
        let session = SessionContext::new(
            SocialHttpClient::builder().build().unwrap(),
            MemorySessionStore::default(),
        );
        let queue = ToastQueue::default();
        (Composer::new(session, Arc::new(queue.clone())), queue)
    }

    #[test]
    fn counts_characters_not_bytes() {
        let (mut composer, _) = composer();
        composer.set_text("é".repeat(MAX_PUBLICATION_CHARS));
        assert_eq!(composer.char_count(), 280);
        assert!(composer.can_submit());
        assert_eq!(composer.counter_tone(), CounterTone::Warning);
    }

    #[test]
    fn counter_tone_thresholds() {
        let (mut composer, _) = composer();
        composer.set_text("a".repeat(224));
        assert_eq!(composer.counter_tone(), CounterTone::Normal);
        composer.set_text("a".repeat(225));
        assert_eq!(composer.counter_tone(), CounterTone::Warning);
        composer.set_text("a".repeat(281));
        assert_eq!(composer.counter_tone(), CounterTone::Over);
    }

    #[test]
    fn rejects_blank_and_long_text() {
        let (mut composer, _) = composer();
        composer.set_text("   \n\t ");
        assert_eq!(composer.validate(), Err(ValidationError::EmptyText));
        composer.set_text("a".repeat(281));
        assert_eq!(composer.validate(), Err(ValidationError::TextTooLong(281)));
    }

    #[tokio::test]
    async fn invalid_draft_is_reported_without_request() {
        let (mut composer, toasts) = composer();
        let mut called = false;

        let result = composer
            .submit(|_| {
                called = true;
                async {}
            })
            .await;

        assert!(matches!(result, Err(Error::Validation(ValidationError::EmptyText))));
        assert!(!called);
        assert_eq!(toasts.len(), 1);
    }

    #[tokio::test]
    async fn retry_without_pending_image_fails() {
        let (mut composer, _) = composer();
        assert!(matches!(
            composer.retry_image().await,
            Err(Error::Validation(ValidationError::Invalid(_)))
        ));
    }
}
