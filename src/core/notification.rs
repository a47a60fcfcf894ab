//! 页面提示消息与延时跳转

use std::time::Duration;

use super::scheduler::{ScheduledTask, Scheduler, Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
}

/// 单个页面视图的提示消息、关闭定时器和跳转
#[derive(Debug)]
pub struct Notifier {
    toasts: Vec<Toast>,
    scheduler: Scheduler,
    toast_lifetime: Duration,
    navigate_delay: Duration,
    next_toast_id: u64,
    navigated_to: Option<String>,
}

impl Notifier {
    pub fn new(toast_lifetime: Duration, navigate_delay: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            scheduler: Scheduler::new(),
            toast_lifetime,
            navigate_delay,
            next_toast_id: 0,
            navigated_to: None,
        }
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.show(message.into(), ToastKind::Success)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.show(message.into(), ToastKind::Error)
    }

    fn show(&mut self, message: String, kind: ToastKind) -> u64 {
        let id = self.next_toast_id;
        self.next_toast_id += 1;
        self.toasts.push(Toast { id, message, kind });
        self.scheduler
            .schedule(self.toast_lifetime, Task::DismissToast(id));
        id
    }

    /// 固定延时后跳转到 `href`
    pub fn navigate_later(&mut self, href: impl Into<String>) -> TaskId {
        self.scheduler
            .schedule(self.navigate_delay, Task::Navigate(href.into()))
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.scheduler.cancel(id)
    }

    /// 推进时间并执行到期任务
    pub fn advance(&mut self, by: Duration) {
        for task in self.scheduler.advance(by) {
            match task {
                Task::DismissToast(id) => self.toasts.retain(|toast| toast.id != id),
                Task::Navigate(href) => self.navigated_to = Some(href),
            }
        }
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn scheduled(&self) -> &[ScheduledTask] {
        self.scheduler.pending()
    }

    /// 尚未到期的跳转
    pub fn pending_navigation(&self) -> Option<(&str, Duration)> {
        self.scheduler
            .pending()
            .iter()
            .find_map(|scheduled| match &scheduled.task {
                Task::Navigate(href) => Some((href.as_str(), scheduled.due)),
                Task::DismissToast(_) => None,
            })
    }

    /// 已经发生的跳转
    pub fn navigated_to(&self) -> Option<&str> {
        self.navigated_to.as_deref()
    }

    /// 提示消息剩余的显示时间
    pub fn remaining_lifetime(&self, toast_id: u64) -> Option<Duration> {
        let elapsed = self.scheduler.elapsed();
        self.scheduler
            .pending()
            .iter()
            .find(|scheduled| scheduled.task == Task::DismissToast(toast_id))
            .map(|scheduled| scheduled.due.saturating_sub(elapsed))
    }
}
