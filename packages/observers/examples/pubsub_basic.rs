//! A subject fanning out events to observers, with lazy pruning.

use observers::Subject;

fn main() {
    let subject = Subject::new();

    let logger = subject.subscribe_fn(|event: &String| {
        println!("logger saw: {event}");
    });

    {
        let transient = subject.subscribe_fn(|event: &String| {
            println!("transient saw: {event}");
        });

        subject.notify(&"first event".to_owned());

        transient.unsubscribe();
    }

    // The transient observer is gone; the next pass prunes it.
    println!("subscribers before prune: {}", subject.len());
    subject.notify(&"second event".to_owned());
    println!("subscribers after notify: {}", subject.len());

    logger.unsubscribe();
}
