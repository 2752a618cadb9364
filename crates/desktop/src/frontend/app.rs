//! Leptos application with routing.

use leptos::*;
use leptos_router::*;

use crate::frontend::api;
use crate::types::InvoiceView;

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <Routes>
                <Route path="/" view=InvoicePage/>
                <Route path="/invoices" view=InvoicesPage/>
                <Route path="/products" view=ProductsPage/>
            </Routes>
        </Router>
    }
}

/// Show a command result: the new view on success, the message on failure.
fn apply(
    result: Result<InvoiceView, String>,
    invoice: RwSignal<Option<InvoiceView>>,
    error: RwSignal<Option<String>>,
) {
    match result {
        Ok(view) => {
            invoice.set(Some(view));
            error.set(None);
        }
        Err(e) => error.set(Some(e)),
    }
}

/// The invoice window: item list, total and actions.
#[component]
fn InvoicePage() -> impl IntoView {
    let invoice = create_rw_signal(None::<InvoiceView>);
    let error = create_rw_signal(None::<String>);
    let status = create_rw_signal(String::new());

    let selected_product = create_rw_signal(String::new());
    let quantity = create_rw_signal("1".to_string());

    let products = create_resource(
        || (),
        |_| async move { api::list_products().await.unwrap_or_default() },
    );

    spawn_local(async move {
        apply(api::current_invoice().await, invoice, error);
    });

    let new_invoice = move |_| {
        status.set(String::new());
        spawn_local(async move {
            apply(api::new_invoice().await, invoice, error);
        });
    };

    let save = move |_| {
        spawn_local(async move {
            let result = api::save_invoice().await;
            if result.is_ok() {
                status.set("Saved".to_string());
            }
            apply(result, invoice, error);
        });
    };

    let refresh = move |_| {
        spawn_local(async move {
            match api::refresh_total().await {
                Ok(total) => invoice.update(|view| {
                    if let Some(view) = view {
                        view.total = total;
                    }
                }),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let add_line = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let product_id = selected_product.get();
        if product_id.is_empty() {
            error.set(Some("Choose a product first".to_string()));
            return;
        }
        let qty = quantity.get();
        spawn_local(async move {
            apply(api::add_item(product_id, qty).await, invoice, error);
        });
    };

    view! {
        <div class="app">
            <header>
                <h1>"Invoice"</h1>
                <A href="/invoices">"Invoices"</A>
                <A href="/products">"Products"</A>
            </header>

            <main>
                {move || error.get().map(|e| view! { <p class="error">{e}</p> })}

                <div class="invoice-meta">
                    {move || invoice.get().map(|view| view! {
                        <span class="created">{view.created_at.format("%Y-%m-%d %H:%M").to_string()}</span>
                    })}
                    <span class="status">{move || status.get()}</span>
                </div>

                <table class="items">
                    <thead>
                        <tr>
                            <th>"Product"</th>
                            <th>"Quantity"</th>
                            <th>"Price"</th>
                            <th>"Total"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            invoice
                                .get()
                                .map(|view| view.items)
                                .unwrap_or_default()
                                .into_iter()
                                .map(|row| {
                                    let id_for_qty = row.item_id.to_string();
                                    let id_for_remove = id_for_qty.clone();
                                    view! {
                                        <tr>
                                            <td>{row.product_name}</td>
                                            <td>
                                                <input
                                                    type="text"
                                                    class="quantity"
                                                    value=row.quantity.to_string()
                                                    on:change=move |ev| {
                                                        let item_id = id_for_qty.clone();
                                                        let qty = event_target_value(&ev);
                                                        spawn_local(async move {
                                                            apply(api::set_quantity(item_id, qty).await, invoice, error);
                                                        });
                                                    }
                                                />
                                            </td>
                                            <td>{row.price}</td>
                                            <td>{row.total}</td>
                                            <td>
                                                <button on:click=move |_| {
                                                    let item_id = id_for_remove.clone();
                                                    spawn_local(async move {
                                                        apply(api::remove_item(item_id).await, invoice, error);
                                                    });
                                                }>
                                                    "Remove"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>

                <div class="total">
                    <span>"Total: "</span>
                    <strong>{move || invoice.get().map(|view| view.total).unwrap_or_default()}</strong>
                    <button on:click=refresh>"Refresh"</button>
                </div>

                <form class="add-line" on:submit=add_line>
                    <select on:change=move |ev| selected_product.set(event_target_value(&ev))>
                        <option value="">"Product..."</option>
                        {move || {
                            products
                                .get()
                                .unwrap_or_default()
                                .into_iter()
                                .map(|p| view! {
                                    <option value=p.id.to_string()>{format!("{} ({})", p.name, p.price)}</option>
                                })
                                .collect_view()
                        }}
                    </select>
                    <input
                        type="text"
                        prop:value=move || quantity.get()
                        on:input=move |ev| quantity.set(event_target_value(&ev))
                    />
                    <button type="submit">"Add line"</button>
                </form>

                <div class="actions">
                    <button on:click=new_invoice>"New invoice"</button>
                    <button on:click=save>"Save"</button>
                </div>
            </main>
        </div>
    }
}

/// Invoice list: saved invoices and those started in this session.
#[component]
fn InvoicesPage() -> impl IntoView {
    let error = create_rw_signal(None::<String>);
    let invoices = create_resource(
        || (),
        |_| async move { api::list_invoices().await },
    );

    view! {
        <div class="app">
            <header>
                <h1>"Invoices"</h1>
                <A href="/">"Back to invoice"</A>
            </header>

            <main>
                {move || error.get().map(|e| view! { <p class="error">{e}</p> })}

                {move || {
                    invoices.get().map(|result| match result {
                        Err(e) => view! { <p class="error">{e}</p> }.into_view(),
                        Ok(list) => view! {
                            <table>
                                <thead>
                                    <tr>
                                        <th>"Created"</th>
                                        <th>"Lines"</th>
                                        <th>"Total"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {list.into_iter().map(|summary| {
                                        let invoice_id = summary.invoice_id.to_string();
                                        view! {
                                            <tr class:current=summary.current>
                                                <td>{summary.created_at.format("%Y-%m-%d %H:%M").to_string()}</td>
                                                <td>{summary.item_count}</td>
                                                <td>{summary.total}</td>
                                                <td>
                                                    <button on:click=move |_| {
                                                        let invoice_id = invoice_id.clone();
                                                        spawn_local(async move {
                                                            match api::open_invoice(invoice_id).await {
                                                                Ok(_) => use_navigate()("/", Default::default()),
                                                                Err(e) => error.set(Some(e)),
                                                            }
                                                        });
                                                    }>
                                                        "Open"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }).collect_view()}
                                </tbody>
                            </table>
                        }.into_view(),
                    })
                }}
            </main>
        </div>
    }
}

/// Product catalog page.
#[component]
fn ProductsPage() -> impl IntoView {
    let name = create_rw_signal(String::new());
    let unit_price = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);

    let products = create_resource(
        || (),
        |_| async move { api::list_products().await.unwrap_or_default() },
    );

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let (n, p) = (name.get(), unit_price.get());
        spawn_local(async move {
            match api::add_product(n, p).await {
                Ok(_) => {
                    name.set(String::new());
                    unit_price.set(String::new());
                    error.set(None);
                    products.refetch();
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="app">
            <header>
                <h1>"Products"</h1>
                <A href="/">"Back to invoice"</A>
            </header>

            <main>
                {move || error.get().map(|e| view! { <p class="error">{e}</p> })}

                {move || {
                    products.get().map(|items| {
                        if items.is_empty() {
                            view! { <p>"No products yet."</p> }.into_view()
                        } else {
                            view! {
                                <table>
                                    <thead>
                                        <tr>
                                            <th>"Name"</th>
                                            <th>"Unit price"</th>
                                            <th>"New price"</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        {items.into_iter().map(|p| {
                                            let product_id = p.id.to_string();
                                            view! {
                                                <tr>
                                                    <td>{p.name}</td>
                                                    <td>{p.price}</td>
                                                    <td>
                                                        <input
                                                            type="text"
                                                            value=p.unit_price.to_string()
                                                            on:change=move |ev| {
                                                                let product_id = product_id.clone();
                                                                let price = event_target_value(&ev);
                                                                spawn_local(async move {
                                                                    match api::update_price(product_id, price).await {
                                                                        Ok(_) => {
                                                                            error.set(None);
                                                                            products.refetch();
                                                                        }
                                                                        Err(e) => error.set(Some(e)),
                                                                    }
                                                                });
                                                            }
                                                        />
                                                    </td>
                                                </tr>
                                            }
                                        }).collect_view()}
                                    </tbody>
                                </table>
                            }.into_view()
                        }
                    })
                }}

                <form on:submit=submit>
                    <div class="form-group">
                        <label for="name">"Name"</label>
                        <input
                            type="text"
                            id="name"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label for="unit-price">"Unit price"</label>
                        <input
                            type="text"
                            id="unit-price"
                            prop:value=move || unit_price.get()
                            on:input=move |ev| unit_price.set(event_target_value(&ev))
                        />
                    </div>
                    <button type="submit">"Add product"</button>
                </form>
            </main>
        </div>
    }
}
