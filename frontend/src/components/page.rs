//! 组件与页面控制器的绑定
//!
//! 控制器状态每次变化都会推进一个修订号信号，读取快照的闭包订阅该信号，
//! 从而触发重新渲染。组件销毁时控制器随之卸载，迟到的响应会被丢弃。

use leptos::prelude::*;
use leptos::task::spawn_local;
use repairhub::controller::ViewController;
use std::future::Future;
use std::time::Duration;

pub struct Page<C: 'static> {
    ctrl: StoredValue<C, LocalStorage>,
    revision: RwSignal<u64>,
}

impl<C: 'static> Clone for Page<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: 'static> Copy for Page<C> {}

impl<C: ViewController> Page<C> {
    /// `notice_ttl` 之后再刷新一次，让过期的成功提示消失
    pub fn mount(ctrl: C, notice_ttl: Duration) -> Self {
        let revision = RwSignal::new(0u64);
        ctrl.cell().on_change(move || {
            let _ = revision.try_update(|r| *r += 1);
            set_timeout(
                move || {
                    let _ = revision.try_update(|r| *r += 1);
                },
                notice_ttl,
            );
        });

        let ctrl = StoredValue::new_local(ctrl);
        on_cleanup(move || {
            let _ = ctrl.try_with_value(|c| c.cell().unmount());
        });
        Self { ctrl, revision }
    }

    /// 当前状态快照；在响应式上下文中读取会订阅变化
    pub fn state(&self) -> C::State {
        self.read(|c| c.state())
    }

    /// 读取控制器上的派生数据（筛选结果、列表视图等）
    pub fn read<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        self.revision.track();
        self.ctrl.with_value(f)
    }

    /// 同步意图（切换筛选、打开弹窗等）
    pub fn act(&self, f: impl FnOnce(&C)) {
        self.ctrl.with_value(f);
    }

    /// 异步意图；控制器句柄的 clone 共享同一份状态
    pub fn spawn<F, Fut>(&self, f: F)
    where
        F: FnOnce(C) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        spawn_local(f(self.ctrl.get_value()));
    }
}
