//! A worker draining jobs on a background thread, with backpressure.

use std::time::Duration;

use job_worker::Worker;
use new_zealand::nz;

fn main() {
    let mut worker = Worker::builder()
        .queue_capacity(nz!(8))
        .thread_name("printer")
        .build(|job: String| {
            println!("processed {job}");
        });

    worker.start();

    for i in 0..16 {
        match worker.add_job(format!("job-{i}")) {
            Ok(()) => {}
            Err(error) => {
                // Queue full: wait for the consumer and retry once.
                std::thread::sleep(Duration::from_millis(10));
                let job = error.into_value();
                worker.add_job(job).expect("consumer drained the queue");
            }
        }
    }

    // Dropping the worker stops the thread and flushes the remainder.
    drop(worker);

    println!("all jobs delivered");
}
