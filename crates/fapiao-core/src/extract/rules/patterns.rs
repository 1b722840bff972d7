//! Regex patterns for Chinese VAT invoice extraction.
//!
//! Patterns deliberately accept common OCR misreads: confused date-unit
//! glyphs (洗 for 年, 晶 for 月/日), mangled 开票日期 labels, and split or
//! truncated party labels (售方/购名称). Terminator alternations such as
//! 统一社会/纳税人 bound label-anchored captures in place of lookahead.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice number, most specific first. Modern electronic invoice
    // numbers are 20 digits; legacy ones are 8.
    pub static ref NUMBER_LABELED_LONG: Regex =
        Regex::new(r"发票号码[:：]\s*(\d{20,})").unwrap();

    pub static ref NUMBER_LABELED: Regex =
        Regex::new(r"发票号码[:：]\s*(\d{8,})").unwrap();

    pub static ref NUMBER_BARE_LONG: Regex = Regex::new(r"(\d{20,})").unwrap();

    pub static ref NUMBER_LOOSE: Regex =
        Regex::new(r"发票[^\n]*?号[^\n]*?[:：]?\s*(\d{8,})").unwrap();

    pub static ref NUMBER_SUFFIX_LABEL: Regex =
        Regex::new(r"号码[:：]\s*(\d{8,})").unwrap();

    // Invoice content. Star-quoted categories (*餐饮服务*) are the printed
    // convention on VAT invoices and the most reliable source.
    pub static ref CONTENT_STARRED: Regex = Regex::new(r"\*([^*\n\r]+)\*").unwrap();

    pub static ref CONTENT_LABELED: Regex = Regex::new(
        r"(?m)(?:项目名称|货物或应税劳务[、，]?服务名称|商品名称|服务名称)[:：]?\s*([^\n\r]+?)(?:\s*\d|$)"
    ).unwrap();

    pub static ref CONTENT_TECH_FEE: Regex =
        Regex::new(r"([^\n\r]*技术服务费[^\n\r]*)").unwrap();

    pub static ref CONTENT_FEE: Regex = Regex::new(r"([^\n\r]*服务费[^\n\r]*)").unwrap();

    pub static ref CONTENT_SERVICE_KEYWORD: Regex = Regex::new(
        r"(?m)([^\n\r]*(?:餐饮|服务|运输|客运|货运|咨询|技术|维修|安装|培训|设计)[^\n\r]*?)(?:\s*\d|$)"
    ).unwrap();

    pub static ref CONTENT_GOODS_SUFFIX: Regex = Regex::new(
        r"(?m)([^\n\r]*(?:费|服务|产品|商品)[^\n\r]*?)(?:\s*[\d,.]|$)"
    ).unwrap();

    // Invoice date. The 开票日期 label itself is frequently misread.
    pub static ref DATE_LABELED: Regex = Regex::new(
        r"开[革票目业]?[目日业]期[:：]?\s*(\d{4}[年洗/\-]\d{1,2}[月晶/\-]\d{1,2}[日晶]?)"
    ).unwrap();

    pub static ref DATE_CHINESE: Regex =
        Regex::new(r"(20\d{2}[年洗]\d{1,2}月\d{1,2}[日晶])").unwrap();

    pub static ref DATE_ANY: Regex =
        Regex::new(r"(\d{4}[年洗/\-]\d{1,2}[月晶/\-]\d{1,2}[日晶]?)").unwrap();

    // Seller name, label-anchored with terminator bounding.
    pub static ref SELLER_SPLIT_LABEL: Regex =
        Regex::new(r"(?m)售方\s*名称[:：]?\s*([^\n\r]+?)(?:统一社会|纳税人|$)").unwrap();

    pub static ref SELLER_FULL_LABEL: Regex =
        Regex::new(r"(?m)销售方名称[:：]?\s*([^\n\r]+?)(?:购买方|统一社会|纳税人|$)").unwrap();

    pub static ref SELLER_SECTION: Regex =
        Regex::new(r"(?m)销售方[:：]?\s*([^\n\r]+?)(?:购买方|统一社会|纳税人|$)").unwrap();

    pub static ref SELLER_ISSUER: Regex =
        Regex::new(r"(?m)开票方[:：]?\s*([^\n\r]+?)(?:收票方|$)").unwrap();

    pub static ref SELLER_SHORT_LABEL: Regex =
        Regex::new(r"(?m)销\s*名称[:：]\s*([^\n\r]+?)(?:买方|购买方|统一社会|纳税人|$)").unwrap();

    pub static ref SELLER_COMPANY_LINE: Regex = Regex::new(
        r"(?m)([^\n\r]*(?:公司|有限|科技|文化|传播|集团|企业|商贸|贸易|出行|酒店)[^\n\r]*?)(?:\s*统一社会信用代码|纳税人识别号|$)"
    ).unwrap();

    // Buyer name.
    pub static ref BUYER_SPLIT_LABEL: Regex =
        Regex::new(r"(?m)买方\s*名称[:：]?\s*([^\n\r]+?)(?:统一社会|纳税人|$)").unwrap();

    pub static ref BUYER_FULL_LABEL: Regex = Regex::new(
        r"(?m)购买方名称[:：]?\s*([^\n\r]+?)(?:销售方|纳税人识别号|统一社会信用代码|$)"
    ).unwrap();

    pub static ref BUYER_SECTION: Regex = Regex::new(
        r"(?m)购买方[:：]?\s*([^\n\r]+?)(?:销售方|纳税人识别号|统一社会信用代码|$)"
    ).unwrap();

    pub static ref BUYER_RECEIVER: Regex =
        Regex::new(r"(?m)收票方[:：]?\s*([^\n\r]+?)(?:开票方|$)").unwrap();

    pub static ref BUYER_SHORT_LABEL: Regex =
        Regex::new(r"(?m)购\s*名称[:：]\s*([^\n\r]+?)(?:销|售方|统一社会|纳税人|$)").unwrap();

    pub static ref BUYER_AFTER_LABEL: Regex = Regex::new(
        r"(?m)买方\s*([^\n\r]*(?:公司|有限|科技|文化|传播|集团|企业|商贸|贸易)[^\n\r]*?)(?:售方|销|统一社会|纳税人|$)"
    ).unwrap();

    pub static ref BUYER_CITY_COMPANY: Regex = Regex::new(
        r"(?m)((?:北京|上海|深圳|广州|天津|重庆|杭州|南京|成都|武汉)[^\n\r]*(?:公司|有限|科技|文化|传播|集团|企业|商贸|贸易)[^\n\r]*?)(?:\s*统一社会信用代码|纳税人识别号|$)"
    ).unwrap();

    // Party-name cleanup: role-label noise around the captured text, and
    // the company-suffix core used to re-extract a clean name.
    pub static ref NAME_LEADING_NOISE: Regex =
        Regex::new(r"^[购买销售称方名和郑:：\s]+").unwrap();

    pub static ref NAME_TRAILING_NOISE: Regex = Regex::new(r"[:：\s]+$").unwrap();

    pub static ref COMPANY_CORE: Regex = Regex::new(
        r"[^\s]*(?:公司|有限|科技|文化|传播|集团|企业|商贸|贸易|出行|酒店)[^\s]*"
    ).unwrap();

    // Tax ids: unified social credit code (18 chars) or taxpayer id (15).
    pub static ref TAX_ID_SELLER_SECTION: Regex = Regex::new(
        r"售方\s*[^\n]*?统一社会信用代码/纳税人识别号[:：]?\s*([A-Z0-9]{15,18})"
    ).unwrap();

    pub static ref TAX_ID_SELLER_LABEL: Regex =
        Regex::new(r"销售方[^\n]*?统一社会信用代码[:：]?\s*([A-Z0-9]{15,18})").unwrap();

    pub static ref TAX_ID_LABELED: Regex =
        Regex::new(r"统一社会信用代码/纳税人识别号[:：]?\s*([A-Z0-9]{15,18})").unwrap();

    // Amount table rows. The 6% VAT rate is the literal marker separating
    // pre-tax amount from tax in service-invoice rows.
    pub static ref AMOUNT_RATE_ROW: Regex =
        Regex::new(r"\*[^*\n]+\*[^\n]*?([\d,.]+)\s+([\d,.]+)\s+6%\s+([\d,.]+)").unwrap();

    pub static ref AMOUNT_SUBTOTAL_ROW: Regex =
        Regex::new(r"合\s*计\s*[¥￥]?([\d,.]+)\s*[¥￥]?([\d,.]+)").unwrap();

    pub static ref AMOUNT_TAX_LABELED: Regex =
        Regex::new(r"税额[:：]\s*[¥￥]?([\d,.]+)").unwrap();

    pub static ref AMOUNT_RATE_SIMPLE: Regex =
        Regex::new(r"([\d,.]+)\s+6%\s+([\d,.]+)").unwrap();

    pub static ref AMOUNT_RATE_ROW_PRETAX: Regex =
        Regex::new(r"\*[^*\n]+\*[^\n]*?([\d,.]+)\s+([\d,.]+)\s+6%").unwrap();

    // Tax-inclusive total (价税合计).
    pub static ref TOTAL_FIGURES: Regex =
        Regex::new(r"\(\s*小[写可]?\s*\)?\s*[¥￥]?([\d,.]+)").unwrap();

    pub static ref TOTAL_AFTER_WORDS_LABEL: Regex =
        Regex::new(r"价税[会合]计[（(]?[大小][写可][）)]?[^\n]*?[¥￥]?([\d,.]+)").unwrap();

    pub static ref TOTAL_LABELED: Regex =
        Regex::new(r"(?:价税[会合]计|合计)[:：]\s*[¥￥]?([\d,.]+)").unwrap();

    // Amount-in-words line (壹佰...圆捌角整); only the leading digit run is
    // trusted, the Chinese numerals themselves OCR too poorly to parse.
    pub static ref TOTAL_WORDS_LINE: Regex =
        Regex::new(r"☒[^\n]*?([\d,.]+)圆\d*角\s*整").unwrap();

    pub static ref TOTAL_FIGURES_STRICT: Regex =
        Regex::new(r"\(小写\)[¥￥]?([\d,.]+)").unwrap();
}
