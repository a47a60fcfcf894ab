//! 页面内的延时任务调度
//!
//! 使用虚拟时间：任务只记录到期时刻，由调用方通过 [`Scheduler::advance`]
//! 推进。HTML 视图把仍未到期的任务渲染成浏览器端的定时器。

use std::time::Duration;

/// 延时任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// 关闭指定的提示消息
    DismissToast(u64),
    /// 跳转到指定页面
    Navigate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TaskId,
    /// 相对页面打开时刻的到期时间
    pub due: Duration,
    pub task: Task,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    elapsed: Duration,
    next_id: u64,
    pending: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在 `delay` 之后执行任务
    pub fn schedule(&mut self, delay: Duration, task: Task) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(ScheduledTask {
            id,
            due: self.elapsed + delay,
            task,
        });
        id
    }

    /// 取消任务，任务已执行或不存在时返回 false
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.id != id);
        self.pending.len() != before
    }

    pub fn pending(&self) -> &[ScheduledTask] {
        &self.pending
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// 推进虚拟时间，按到期顺序返回到期的任务
    pub fn advance(&mut self, by: Duration) -> Vec<Task> {
        self.elapsed += by;
        let now = self.elapsed;

        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|scheduled| scheduled.due <= now);
        self.pending = rest;

        // sort_by_key 是稳定排序，同一时刻按登记顺序执行
        due.sort_by_key(|scheduled| scheduled.due);
        due.into_iter().map(|scheduled| scheduled.task).collect()
    }
}
