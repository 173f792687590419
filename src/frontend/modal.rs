use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use wasm_bindgen::JsCast;
use web_sys::{MouseEvent, Node};
use yew::prelude::*;

use crate::log::{log_event, LogLevel};
use crate::products::{ProductCatalog, ProductEntry};

/// Hands the mounted modal's `open` callback to code outside the Yew tree.
#[derive(Clone, Default)]
pub struct ModalBridge(Rc<RefCell<Option<Callback<String>>>>);

impl PartialEq for ModalBridge {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl ModalBridge {
    pub fn open(&self, product_name: &str) {
        let callback = self.0.borrow().clone();
        match callback {
            Some(callback) => callback.emit(product_name.to_string()),
            None => log_event(
                LogLevel::Warn,
                "modal.not_mounted",
                json!({ "product": product_name }),
            ),
        }
    }

    fn connect(&self, callback: Callback<String>) {
        *self.0.borrow_mut() = Some(callback);
    }

    fn disconnect(&self) {
        self.0.borrow_mut().take();
    }
}

#[derive(Properties, PartialEq)]
pub struct ProductModalProps {
    pub catalog: Rc<ProductCatalog>,
    pub bridge: ModalBridge,
}

#[derive(Properties, PartialEq)]
struct ProductDetailsProps {
    product: ProductEntry,
}

#[function_component(ProductDetails)]
fn product_details(props: &ProductDetailsProps) -> Html {
    let product = &props.product;

    html! {
        <>
            <h2>{product.name.clone()}</h2>
            <div class="product-images-grid">
                { for product.images.iter().map(|src| html! {
                    <img src={src.clone()} class="product-image" alt={product.name.clone()} loading="lazy" />
                }) }
            </div>
            <div class="modal-description">
                { for product.description.iter().map(|paragraph| html! {
                    <p>{ Html::from_html_unchecked(AttrValue::from(paragraph.clone())) }</p>
                }) }
            </div>
            <div class="tech-specs">
                <h3>{"Specifications"}</h3>
                <ul>
                    { for product.specs.iter().map(|row| html! {
                        <li><strong>{format!("{}:", row.label)}</strong>{" "}{row.value.clone()}</li>
                    }) }
                </ul>
            </div>
        </>
    }
}

#[function_component(ProductModal)]
pub fn product_modal(props: &ProductModalProps) -> Html {
    let selected = use_state(|| None::<ProductEntry>);
    let backdrop = use_node_ref();

    {
        let bridge = props.bridge.clone();
        let catalog = props.catalog.clone();
        let selected = selected.clone();
        use_effect_with((), move |_| {
            bridge.connect(Callback::from(move |name: String| {
                match catalog.get(&name) {
                    Some(product) => {
                        log_event(LogLevel::Debug, "modal.opened", json!({ "product": product.name }));
                        selected.set(Some(product.clone()));
                    }
                    None => log_event(
                        LogLevel::Warn,
                        "modal.unknown_product",
                        json!({ "product": name.trim() }),
                    ),
                }
            }));
            move || bridge.disconnect()
        });
    }

    let close = {
        let selected = selected.clone();
        Callback::from(move |_: ()| selected.set(None))
    };

    let on_close_click = {
        let close = close.clone();
        Callback::from(move |_: MouseEvent| close.emit(()))
    };

    let on_backdrop_click = {
        let backdrop = backdrop.clone();
        Callback::from(move |event: MouseEvent| {
            let target = event.target().and_then(|target| target.dyn_into::<Node>().ok());
            if target.is_some() && target == backdrop.get() {
                close.emit(());
            }
        })
    };

    html! {
        <div
            id="productModal"
            ref={backdrop}
            class={classes!("modal", selected.is_some().then_some("active"))}
            onclick={on_backdrop_click}
            aria-hidden={selected.is_none().to_string()}
        >
            <div class="modal-content">
                <button class="modal-close" type="button" aria-label="Close" onclick={on_close_click}>
                    {"×"}
                </button>
                <div class="modal-scroll-container">
                    if let Some(product) = (*selected).clone() {
                        <ProductDetails {product} />
                    }
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloo::timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;
    use web_sys::{Element, HtmlElement};
    use yew::AppHandle;

    use crate::frontend::dom::document;

    wasm_bindgen_test_configure!(run_in_browser);

    struct Mounted {
        root: Element,
        bridge: ModalBridge,
        handle: AppHandle<ProductModal>,
    }

    impl Mounted {
        fn count(&self, selector: &str) -> u32 {
            self.root
                .query_selector_all(selector)
                .expect("valid selector")
                .length()
        }

        fn is_open(&self) -> bool {
            self.root
                .query_selector(".modal")
                .expect("valid selector")
                .expect("modal rendered")
                .class_list()
                .contains("active")
        }

        fn click(&self, selector: &str) {
            self.root
                .query_selector(selector)
                .expect("valid selector")
                .expect("element rendered")
                .unchecked_into::<HtmlElement>()
                .click();
        }

        fn unmount(self) {
            self.handle.destroy();
            self.root.remove();
        }
    }

    /// Lets Yew flush pending renders and effects.
    async fn settle() {
        TimeoutFuture::new(0).await;
    }

    async fn mount() -> Mounted {
        let document = document().expect("document");
        let root = document.create_element("div").expect("root");
        document.body().expect("body").append_child(&root).expect("append");

        let bridge = ModalBridge::default();
        let catalog = Rc::new(ProductCatalog::load().expect("bundled catalog is valid"));
        let handle = yew::Renderer::<ProductModal>::with_root_and_props(
            root.clone(),
            ProductModalProps {
                catalog,
                bridge: bridge.clone(),
            },
        )
        .render();
        settle().await;

        Mounted { root, bridge, handle }
    }

    #[wasm_bindgen_test]
    async fn opening_a_product_renders_its_images_and_paragraphs() {
        let modal = mount().await;
        assert!(!modal.is_open());

        modal.bridge.open("Green Guard-Mosquito Trapper");
        settle().await;

        assert!(modal.is_open());
        assert_eq!(modal.count(".product-image"), 5);
        assert_eq!(modal.count(".modal-description p"), 7);
        assert_eq!(modal.count(".tech-specs li"), 0);
        modal.unmount();
    }

    #[wasm_bindgen_test]
    async fn unknown_product_leaves_the_modal_closed() {
        let modal = mount().await;

        modal.bridge.open("Unknown");
        settle().await;

        assert!(!modal.is_open());
        assert_eq!(modal.count(".product-image"), 0);
        modal.unmount();
    }

    #[wasm_bindgen_test]
    async fn card_titles_are_trimmed_before_lookup() {
        let modal = mount().await;

        modal.bridge.open("\n   Smart Socket  ");
        settle().await;

        assert!(modal.is_open());
        assert_eq!(modal.count(".product-image"), 5);
        modal.unmount();
    }

    #[wasm_bindgen_test]
    async fn only_backdrop_and_close_button_dismiss() {
        let modal = mount().await;
        modal.bridge.open("Travel Friend");
        settle().await;

        modal.click(".modal-content");
        settle().await;
        assert!(modal.is_open());

        modal.click(".modal");
        settle().await;
        assert!(!modal.is_open());

        modal.bridge.open("Travel Friend");
        settle().await;
        modal.click(".modal-close");
        settle().await;
        assert!(!modal.is_open());
        modal.unmount();
    }
}
