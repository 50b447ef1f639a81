use crate::model::GalleryItem;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct GalleryProps {
    pub items: Rc<Vec<GalleryItem>>,
    pub on_select: Callback<usize>,
}

#[function_component(Gallery)]
pub fn gallery(props: &GalleryProps) -> Html {
    html! {
        <section id="gallery" class="gallery">
            <h2 class="gallery__title">{"Gallery"}</h2>
            <div class="gallery__grid">
                { for props.items.iter().enumerate().map(|(index, item)| {
                    let on_select = props.on_select.clone();
                    let open = Callback::from(move |_: MouseEvent| on_select.emit(index));
                    html! {
                        <figure class="gallery__item" key={index}>
                            <img
                                src={item.src.clone()}
                                alt={item.alt.clone()}
                                data-enlargeable="true"
                                onclick={open}
                            />
                            <figcaption>{ item.alt.clone() }</figcaption>
                        </figure>
                    }
                }) }
            </div>
        </section>
    }
}
