use log::info;
pub type TaskID = i32;

/// One unit of repeatable work. Returning `false` ends the task.
pub trait SteppableTask: Send + 'static {
    fn step(&mut self) -> bool;
}

pub struct ThreadManager {
    current_task_id: TaskID,
    tasks: std::collections::HashMap<TaskID, ManagedTask>,
}

impl ThreadManager {
    #[must_use]
    pub fn new() -> Self {
        ThreadManager {
            current_task_id: 0,
            tasks: std::collections::HashMap::new(),
        }
    }

    /// Runs `task` on its own named thread.
    ///
    /// Scheduling is fixed-delay: after each step the thread waits `delay`
    /// (or until stopped) before stepping again, so the effective period is
    /// `delay` plus however long the step took. A zero `delay` steps
    /// back-to-back.
    ///
    /// # Errors
    ///
    /// Returns the spawn error if the OS refuses to create the thread.
    pub fn add_task<T>(&mut self, task: T, delay: std::time::Duration) -> std::io::Result<TaskID>
    where
        T: SteppableTask,
    {
        let id = self.current_task_id;

        let (stop_sender, stop_receiver) = crossbeam_channel::bounded::<()>(1);

        let handle = std::thread::Builder::new()
            .name(std::any::type_name::<T>().to_string())
            .spawn(move || {
                if delay.is_zero() {
                    run_task_continuously(task, &stop_receiver);
                } else {
                    run_task_with_delay(task, delay, &stop_receiver);
                }
            })?;
        self.tasks.insert(
            id,
            ManagedTask {
                handle,
                stop_sender,
            },
        );
        self.current_task_id += 1;
        Ok(id)
    }

    pub fn stop_all_tasks(&self) {
        info!("ThreadManager: Signaling all tasks to stop...");
        for task in self.tasks.values() {
            let _ = task.stop_sender.try_send(());
        }
    }

    pub fn wait_on_task_finish(&mut self, task_id: TaskID) {
        if let Some(task) = self.tasks.remove(&task_id) {
            if task.handle.join().is_err() {
                log::error!("ThreadManager: task {task_id} panicked");
            }
        }
    }
}

impl Default for ThreadManager {
    fn default() -> Self {
        ThreadManager::new()
    }
}

fn run_task_continuously<T: SteppableTask>(
    mut task: T,
    stop_receiver: &crossbeam_channel::Receiver<()>,
) {
    loop {
        match stop_receiver.try_recv() {
            Ok(()) | Err(crossbeam_channel::TryRecvError::Disconnected) => break,
            Err(crossbeam_channel::TryRecvError::Empty) => {}
        }

        if !task.step() {
            break;
        }

        std::thread::yield_now();
    }
}

fn run_task_with_delay<T: SteppableTask>(
    mut task: T,
    delay: std::time::Duration,
    stop_receiver: &crossbeam_channel::Receiver<()>,
) {
    loop {
        let started = std::time::Instant::now();
        if !task.step() {
            break;
        }
        log::debug!("Step took {0:?}, next in {delay:?}", started.elapsed());

        // Wait for the delay OR a stop signal
        match stop_receiver.recv_timeout(delay) {
            Ok(()) | Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
        }
    }
}

struct ManagedTask {
    handle: std::thread::JoinHandle<()>,
    stop_sender: crossbeam_channel::Sender<()>,
}

#[cfg(test)]
mod tests {
    use super::{SteppableTask, ThreadManager};

    // A simple runnable task for counting and self-stopping
    #[derive(Debug)]
    struct CountingTask {
        count: usize,
        limit: usize,
        sender: std::sync::mpsc::Sender<usize>,
    }

    impl CountingTask {
        fn new(limit: usize, sender: std::sync::mpsc::Sender<usize>) -> Self {
            Self {
                count: 0,
                limit,
                sender,
            }
        }
    }

    impl SteppableTask for CountingTask {
        fn step(&mut self) -> bool {
            self.count += 1;
            self.sender.send(self.count).unwrap();
            self.count < self.limit
        }
    }

    // Runs until stopped externally, reporting when each step happened
    #[derive(Debug)]
    struct LoopingTask {
        sender: std::sync::mpsc::Sender<std::time::Instant>,
        step_duration: std::time::Duration,
    }

    impl LoopingTask {
        fn new(sender: std::sync::mpsc::Sender<std::time::Instant>) -> Self {
            Self {
                sender,
                step_duration: std::time::Duration::ZERO,
            }
        }
    }

    impl SteppableTask for LoopingTask {
        fn step(&mut self) -> bool {
            let _ = self.sender.send(std::time::Instant::now());
            std::thread::sleep(self.step_duration);
            true
        }
    }

    #[test]
    fn when_multiple_tasks_added_then_all_tasks_completed() {
        let mut manager = ThreadManager::new();
        let (counter_1_sender, counter_1_receiver) = std::sync::mpsc::channel();
        let (counter_2_sender, counter_2_receiver) = std::sync::mpsc::channel();

        let counter_1_limit = 5;
        let counter_2_limit = 10;
        let task_1 = CountingTask::new(counter_1_limit, counter_1_sender);
        let task_2 = CountingTask::new(counter_2_limit, counter_2_sender);
        let task_1_id = manager
            .add_task(task_1, std::time::Duration::from_millis(20))
            .unwrap();
        let task_2_id = manager
            .add_task(task_2, std::time::Duration::from_millis(20))
            .unwrap();

        manager.wait_on_task_finish(task_2_id);
        manager.wait_on_task_finish(task_1_id);

        assert!(manager.tasks.is_empty());

        let counter_2_messages: Vec<usize> = counter_2_receiver.try_iter().collect();
        let counter_1_messages: Vec<usize> = counter_1_receiver.try_iter().collect();
        assert_eq!(counter_1_messages.len(), counter_1_limit);
        assert_eq!(counter_2_messages.len(), counter_2_limit);
    }

    #[test]
    fn when_stop_all_tasks_is_called_then_looping_task_ends() {
        let mut manager = ThreadManager::new();
        let (counter_sender, counter_receiver) = std::sync::mpsc::channel();
        let (looper_sender, _looper_receiver) = std::sync::mpsc::channel();

        let counter_limit = 5;
        let counter_task = CountingTask::new(counter_limit, counter_sender);
        let counter_task_id = manager
            .add_task(counter_task, std::time::Duration::from_millis(20))
            .unwrap();
        let looping_task_id = manager
            .add_task(
                LoopingTask::new(looper_sender),
                std::time::Duration::from_millis(20),
            )
            .unwrap();

        // give ample time for counter to be executed
        std::thread::sleep(std::time::Duration::from_millis(counter_limit as u64 * 60));
        manager.stop_all_tasks();
        manager.wait_on_task_finish(counter_task_id);
        manager.wait_on_task_finish(looping_task_id);

        assert!(manager.tasks.is_empty());

        let counter_messages: Vec<usize> = counter_receiver.try_iter().collect();
        assert_eq!(counter_messages.len(), counter_limit);
    }

    #[test]
    fn when_step_is_slow_then_delay_is_added_after_it() {
        let mut manager = ThreadManager::new();
        let (sender, receiver) = std::sync::mpsc::channel();
        let step_duration = std::time::Duration::from_millis(40);
        let delay = std::time::Duration::from_millis(60);

        let task_id = manager
            .add_task(
                LoopingTask {
                    sender,
                    step_duration,
                },
                delay,
            )
            .unwrap();

        let first = receiver.recv().unwrap();
        let second = receiver.recv().unwrap();
        manager.stop_all_tasks();
        manager.wait_on_task_finish(task_id);

        assert!(second - first >= step_duration + delay);
    }

    #[test]
    fn when_delay_is_zero_then_task_runs_back_to_back_until_stopped() {
        let mut manager = ThreadManager::new();
        let (sender, receiver) = std::sync::mpsc::channel();

        let task_id = manager
            .add_task(LoopingTask::new(sender), std::time::Duration::ZERO)
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        manager.stop_all_tasks();
        manager.wait_on_task_finish(task_id);

        assert!(receiver.try_iter().count() > 1);
    }

    #[test]
    fn when_wait_on_task_finish_called_then_task_id_removed() {
        let mut manager = ThreadManager::new();
        let (sender, _receiver) = std::sync::mpsc::channel();

        let task_id1 = manager
            .add_task(
                LoopingTask::new(sender.clone()),
                std::time::Duration::from_millis(100),
            )
            .unwrap();
        let task_id2 = manager
            .add_task(
                LoopingTask::new(sender.clone()),
                std::time::Duration::from_millis(100),
            )
            .unwrap();

        assert_eq!(manager.tasks.len(), 2);

        manager.stop_all_tasks();
        manager.wait_on_task_finish(task_id1);

        assert_eq!(manager.tasks.len(), 1);
        assert!(manager.tasks.contains_key(&task_id2));
        assert!(!manager.tasks.contains_key(&task_id1));

        manager.wait_on_task_finish(task_id2);
        assert!(manager.tasks.is_empty());
    }
}
