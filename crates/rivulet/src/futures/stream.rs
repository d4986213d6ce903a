use core::{
    pin::Pin,
    task::{Context, Poll},
};

use ::futures::{
    Stream,
    channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded},
};
use pin_project_lite::pin_project;

use crate::{Observable, Observer, StreamError, Subscription};

struct ChannelObserver<T> {
    sender: Option<UnboundedSender<Result<T, StreamError>>>,
}

impl<T> ChannelObserver<T> {
    fn send(&mut self, item: Result<T, StreamError>) {
        if let Some(sender) = &self.sender {
            // The receiver may already be gone; the subscription is then
            // cancelled by its drop.
            let _ = sender.unbounded_send(item);
        }
    }
}

impl<T> Observer<T> for ChannelObserver<T> {
    fn next(&mut self, value: T) {
        self.send(Ok(value));
    }

    fn error(&mut self, err: StreamError) {
        self.send(Err(err));
        self.sender = None;
    }

    fn complete(&mut self) {
        self.sender = None;
    }
}

pin_project! {
    /// A [`Stream`] over the notifications of one subscription.
    ///
    /// Values arrive as `Ok`, a failure as a final `Err`, and completion ends
    /// the stream. Nothing is produced unless the clock driving the source is
    /// advanced; polling only drains what has already been pushed. Dropping
    /// the stream unsubscribes.
    #[must_use = "streams do nothing unless polled"]
    pub struct ObservableStream<T> {
        #[pin]
        receiver: UnboundedReceiver<Result<T, StreamError>>,
        subscription: Subscription,
    }

    impl<T> PinnedDrop for ObservableStream<T> {
        fn drop(this: Pin<&mut Self>) {
            this.project().subscription.unsubscribe();
        }
    }
}

impl<T> ObservableStream<T> {
    /// The subscription feeding this stream.
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl<T> Stream for ObservableStream<T> {
    type Item = Result<T, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().receiver.poll_next(cx)
    }
}

impl<T: 'static> Observable<T> {
    /// Subscribes and exposes the notifications as a `futures` [`Stream`].
    ///
    /// # Example
    ///
    /// ```
    /// use futures::{StreamExt, executor::block_on};
    /// use rivulet::{VirtualClock, timer};
    ///
    /// let clock = VirtualClock::new();
    /// let stream = timer(10, &clock).map(|_| "ready").into_stream();
    /// clock.advance_millis(10);
    ///
    /// let items: Vec<_> = block_on(stream.collect());
    /// assert_eq!(items, [Ok("ready")]);
    /// ```
    pub fn into_stream(self) -> ObservableStream<T> {
        let (sender, receiver) = unbounded();
        let subscription = self.subscribe(ChannelObserver {
            sender: Some(sender),
        });
        ObservableStream {
            receiver,
            subscription,
        }
    }
}
