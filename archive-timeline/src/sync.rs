use std::cell::RefCell;
use std::rc::Rc;

use blog_common::ViewConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, ScrollBehavior, ScrollToOptions, Window};

use crate::scroll::{AnchorPosition, ScrollTracker};

/// 监听的窗口事件
const EVENTS: [&str; 2] = ["scroll", "resize"];

struct SyncState {
    tracker: ScrollTracker,
    anchors: Vec<String>,
    header_height: f64,
    frame_handle: Option<i32>,
    on_change: js_sys::Function,
}

/// 测量锚点元素相对文档顶部的位置，找不到的元素跳过
fn measure_anchors(window: &Window, anchors: &[String], scroll_y: f64) -> Vec<AnchorPosition> {
    let Some(document) = window.document() else {
        return Vec::new();
    };
    anchors
        .iter()
        .filter_map(|id| {
            document
                .get_element_by_id(id)
                .map(|el| AnchorPosition::new(id.as_str(), el.get_bounding_client_rect().top() + scroll_y))
        })
        .collect()
}

fn parse_anchors(anchors: JsValue) -> Result<Vec<String>, JsValue> {
    serde_wasm_bindgen::from_value(anchors).map_err(|e| {
        let message = format!("解析锚点列表失败: {}", e);
        console::log_1(&JsValue::from_str(&message));
        JsValue::from_str(&message)
    })
}

/// 归档页滚动同步 - 监听滚动与窗口尺寸变化，回调当前高亮的月份锚点
#[wasm_bindgen]
pub struct ScrollSyncJS {
    window: Window,
    state: Rc<RefCell<SyncState>>,
    listener: Option<Closure<dyn FnMut()>>,
    // 由 listener 调度，listener 卸载后才释放
    _frame: Rc<Closure<dyn FnMut(f64)>>,
}

#[wasm_bindgen]
impl ScrollSyncJS {
    /// anchors: 锚点 ID 数组（与快捷跳转顺序一致）；on_change: 高亮锚点变化时的回调
    #[wasm_bindgen(constructor)]
    pub fn new(
        anchors: JsValue,
        on_change: js_sys::Function,
        config_json: Option<String>,
    ) -> Result<ScrollSyncJS, JsValue> {
        console_error_panic_hook::set_once();

        let config = match config_json {
            Some(json) => ViewConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => ViewConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("当前环境没有 window"))?;

        let state = Rc::new(RefCell::new(SyncState {
            tracker: ScrollTracker::new(config.scroll),
            anchors: parse_anchors(anchors)?,
            header_height: 0.0,
            frame_handle: None,
            on_change,
        }));

        let frame = {
            let state = Rc::clone(&state);
            let window = window.clone();
            Rc::new(Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
                let changed = {
                    let mut state = state.borrow_mut();
                    state.frame_handle = None;
                    let scroll_y = window.scroll_y().unwrap_or(0.0);
                    let positions = measure_anchors(&window, &state.anchors, scroll_y);
                    if state.tracker.on_frame(scroll_y, &positions) {
                        state.tracker.active().map(|active| (active.to_string(), state.on_change.clone()))
                    } else {
                        None
                    }
                };
                // 回调可能再次调用本对象，先释放借用
                if let Some((active, callback)) = changed {
                    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&active)) {
                        console::log_2(&JsValue::from_str("锚点回调执行失败:"), &e);
                    }
                }
            }))
        };

        let listener = {
            let state = Rc::clone(&state);
            let window = window.clone();
            let frame = Rc::clone(&frame);
            Closure::<dyn FnMut()>::new(move || {
                if !state.borrow_mut().tracker.request_frame() {
                    return;
                }
                let callback: &js_sys::Function = (*frame).as_ref().unchecked_ref();
                match window.request_animation_frame(callback) {
                    Ok(handle) => state.borrow_mut().frame_handle = Some(handle),
                    Err(_) => state.borrow_mut().tracker.cancel_frame(),
                }
            })
        };

        for event in EVENTS {
            window.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())?;
        }

        let sync = ScrollSyncJS {
            window,
            state,
            listener: Some(listener),
            _frame: frame,
        };
        sync.refresh();
        Ok(sync)
    }

    /// 时间线重新渲染后更新锚点列表
    pub fn set_anchors(&mut self, anchors: JsValue) -> Result<(), JsValue> {
        self.state.borrow_mut().anchors = parse_anchors(anchors)?;
        self.refresh();
        Ok(())
    }

    /// 顶部导航高度由布局层提供，变化时更新
    pub fn set_header_height(&mut self, height: f64) {
        self.state.borrow_mut().header_height = height;
    }

    /// 当前高亮的锚点
    pub fn active(&self) -> Option<String> {
        self.state.borrow().tracker.active().map(str::to_string)
    }

    /// 平滑滚动到指定月份，锚点不存在时返回 false
    pub fn jump_to(&self, anchor_id: &str) -> Result<bool, JsValue> {
        let Some(element) = self.window.document().and_then(|doc| doc.get_element_by_id(anchor_id)) else {
            return Ok(false);
        };
        let scroll_y = self.window.scroll_y()?;
        let anchor_top = element.get_bounding_client_rect().top() + scroll_y;
        let target = {
            let state = self.state.borrow();
            state.tracker.jump_target(anchor_top, state.header_height)
        };

        let options = ScrollToOptions::new();
        options.set_top(target);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
        Ok(true)
    }

    /// 卸载：移除监听并取消待执行的帧回调
    pub fn detach(&mut self) {
        if let Some(listener) = self.listener.take() {
            for event in EVENTS {
                let _ = self
                    .window
                    .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
            }
        }

        let mut state = self.state.borrow_mut();
        if let Some(handle) = state.frame_handle.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
        state.tracker.detach();
    }
}

impl ScrollSyncJS {
    /// 立即按当前滚动位置同步一次
    fn refresh(&self) {
        if let Some(listener) = &self.listener {
            let callback: &js_sys::Function = listener.as_ref().unchecked_ref();
            let _ = callback.call0(&JsValue::NULL);
        }
    }
}

impl Drop for ScrollSyncJS {
    fn drop(&mut self) {
        self.detach();
    }
}
