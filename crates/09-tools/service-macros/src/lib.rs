//! # Service Macros
//!
//! 在编译期为一个内联模块生成服务容器的过程宏。
//!
//! ## 核心宏
//!
//! - [`service_module`] - 扫描模块中的服务声明，在模块末尾追加容器模块
//!
//! ## 使用示例
//!
//! ```ignore
//! use service_macros::service_module;
//!
//! #[service_module(namespace = "container")]
//! mod services {
//!     use di_abstractions::ServiceProvider;
//!     use std::rc::Rc;
//!
//!     #[service(singleton)]
//!     pub struct Clock;
//!
//!     #[service(transient)]
//!     pub struct Greeter {
//!         clock: Rc<Clock>,
//!     }
//!
//!     impl Greeter {
//!         pub fn new(clock: Rc<Clock>) -> Self {
//!             Self { clock }
//!         }
//!     }
//! }
//!
//! let provider = services::container::ServiceProvider::new();
//! let greeter = provider.get_required_service::<services::Greeter>()?;
//! ```

use proc_macro::TokenStream;

mod service_module;

/// 服务容器生成宏
///
/// 只能用于内联模块。模块内的辅助属性在展开后被移除：
///
/// - `#[service(singleton | transient | scoped[, key = Type])]` - 服务标记
/// - `#[factory]` - 工厂方法，签名为 `fn(&dyn ServiceProvider) -> Self`
/// - `#[extends(Base)]` - 继承基类型的服务标记
/// - `#[abstract_service]` - 只提供标记、自身不注册
///
/// # 参数
///
/// - `namespace = "name"` - 生成模块名（默认 `container`）
/// - `provider = "Name"` - 根提供者类型名（默认 `ServiceProvider`）
/// - `scoped_provider = "Name"` - 作用域提供者类型名（默认 `ScopedServiceProvider`）
/// - `runtime = "path"` - 运行时契约 crate 路径（默认 `::di_abstractions`）
/// - `strict` - 标记冲突视为编译错误
///
/// # 示例
///
/// ```text
/// #[service_module(namespace = "services", strict)]
/// mod app {
///     #[service(scoped)]
///     pub struct Session;
/// }
/// ```
#[proc_macro_attribute]
pub fn service_module(args: TokenStream, input: TokenStream) -> TokenStream {
    service_module::service_module_impl(args, input)
}
